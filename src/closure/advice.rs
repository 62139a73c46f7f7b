//! Preparation advice derived from a calculation

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::CalculationResult;
use crate::models::DistrictType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceKind {
    Preparation,
    Safety,
    Timing,
    Alternative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A single actionable suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub kind: AdviceKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl Advice {
    fn new(kind: AdviceKind, title: &str, description: &str, priority: Priority) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
            priority,
        }
    }
}

/// Build advice for a result, in display order. Always ends with a
/// reminder to watch official channels.
#[must_use]
pub fn advise(result: &CalculationResult) -> Vec<Advice> {
    let probability = result.probability;
    let observation = &result.observation;
    let mut advice = Vec::new();

    if probability >= 70 {
        advice.push(Advice::new(
            AdviceKind::Preparation,
            "Prepare for School Closure",
            "High probability of snow day. Arrange childcare and work-from-home plans.",
            Priority::High,
        ));
    }

    if observation.temperature <= 20.0 {
        advice.push(Advice::new(
            AdviceKind::Safety,
            "Extreme Cold Precautions",
            "Dangerous temperatures. Limit outdoor exposure and check on elderly neighbors.",
            Priority::High,
        ));
    }

    if observation.snowfall >= 6.0 {
        advice.push(Advice::new(
            AdviceKind::Preparation,
            "Heavy Snow Preparation",
            "Stock up on essentials and ensure you have backup power sources.",
            Priority::High,
        ));
    }

    if observation.wind_speed >= 20.0 {
        advice.push(Advice::new(
            AdviceKind::Safety,
            "High Wind Advisory",
            "Strong winds may cause power outages. Secure outdoor items.",
            Priority::Medium,
        ));
    }

    if result.classification.district == DistrictType::Rural {
        advice.push(Advice::new(
            AdviceKind::Timing,
            "Rural District Alert",
            "Rural districts often close earlier. Check announcements by 5 AM.",
            Priority::Medium,
        ));
    }

    if probability >= 30 {
        advice.push(Advice::new(
            AdviceKind::Alternative,
            "Plan Alternative Activities",
            "Prepare indoor activities and educational resources for potential home day.",
            Priority::Low,
        ));
    }

    advice.push(Advice::new(
        AdviceKind::Timing,
        "Monitor Official Channels",
        "Check school website and local news between 5-6 AM for closure announcements.",
        Priority::Medium,
    ));

    advice
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}
