//! Recommendation bands for a closure probability

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk band, from the top down. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    LowToModerate,
    Moderate,
    High,
    VeryHigh,
    ExtremelyHigh,
}

impl RiskLevel {
    /// Band for an (unrounded) probability
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        match probability {
            p if p >= 90.0 => RiskLevel::ExtremelyHigh,
            p if p >= 80.0 => RiskLevel::VeryHigh,
            p if p >= 70.0 => RiskLevel::High,
            p if p >= 55.0 => RiskLevel::Moderate,
            p if p >= 35.0 => RiskLevel::LowToModerate,
            p if p >= 15.0 => RiskLevel::Low,
            _ => RiskLevel::VeryLow,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::ExtremelyHigh => "Extremely High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::LowToModerate => "Low to Moderate Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::VeryLow => "Very Low Risk",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            RiskLevel::ExtremelyHigh => "School closure almost certain!",
            RiskLevel::VeryHigh => "School closure extremely likely!",
            RiskLevel::High => "Strong chance of school closure",
            RiskLevel::Moderate => "Monitor school announcements closely",
            RiskLevel::LowToModerate => "Prepare for potential closure",
            RiskLevel::Low => "School likely to remain open",
            RiskLevel::VeryLow => "School will almost certainly remain open",
        }
    }

    /// Full recommendation text, e.g. "High Risk - Strong chance of school closure"
    #[must_use]
    pub fn recommendation(self) -> String {
        format!("{} - {}", self.label(), self.description())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
