//! Hourly closure outlook points and their summary

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One hour of the closure outlook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Start of the hour, in the caller's local offset
    pub timestamp: DateTime<FixedOffset>,
    /// Closure probability for this hour (0-100)
    pub probability: u8,
    /// Local hour of day (0-23)
    pub hour: u32,
    /// Whether the point falls in the first 24-hour block
    pub is_today: bool,
}

impl ForecastPoint {
    /// Tooltip label relative to `today`, e.g. "Tomorrow, 6:00 AM"
    #[must_use]
    pub fn label(&self, today: NaiveDate) -> String {
        let date = self.timestamp.date_naive();
        let day = if date == today {
            "Today".to_string()
        } else if Some(date) == today.succ_opt() {
            "Tomorrow".to_string()
        } else {
            self.timestamp.format("%a, %b %-d").to_string()
        };
        format!("{day}, {}", self.timestamp.format("%-I:%M %p"))
    }
}

/// Headline numbers shown above the outlook chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub peak_probability: u8,
    /// First hour reaching the peak
    pub peak_at: DateTime<FixedOffset>,
    /// Rounded mean over all points
    pub average_probability: u8,
}

impl ForecastSummary {
    /// Summarise a sequence of points; `None` when there are none
    #[must_use]
    pub fn from_points(points: &[ForecastPoint]) -> Option<Self> {
        let first = points.first()?;
        let peak = points
            .iter()
            .fold(first, |best, p| if p.probability > best.probability { p } else { best });

        let total: u32 = points.iter().map(|p| u32::from(p.probability)).sum();
        let average = (f64::from(total) / points.len() as f64).round();

        Some(Self {
            peak_probability: peak.probability,
            peak_at: peak.timestamp,
            average_probability: average.clamp(0.0, 100.0) as u8,
        })
    }
}
