//! Payload handed to the narrative commentary service
//!
//! The engine does not generate or depend on commentary; it only shapes the
//! inputs the external writer expects.

use serde::{Deserialize, Serialize};

use super::engine::CalculationResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub zip_code: String,
    pub temperature: f64,
    pub snowfall: f64,
    pub wind_speed: f64,
    /// "rural", "urban" or "suburban"
    pub school_district: String,
    pub probability: u8,
}

impl NarrativeRequest {
    #[must_use]
    pub fn new(postal_code: &str, result: &CalculationResult) -> Self {
        Self {
            zip_code: postal_code.trim().to_string(),
            temperature: result.observation.temperature,
            snowfall: result.observation.snowfall,
            wind_speed: result.observation.wind_speed,
            school_district: result.classification.district.as_str().to_string(),
            probability: result.probability,
        }
    }
}
