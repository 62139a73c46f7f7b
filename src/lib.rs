//! `SnowDay` - School closure probability estimates
//!
//! This library provides the closure probability engine, postal code
//! classification, factor weighting and the 48-hour snow day outlook.

pub mod api;
pub mod closure;
pub mod config;
pub mod error;
pub mod forecast;
pub mod location_resolver;
pub mod models;
pub mod web;

// Re-export core types for public API
pub use closure::{Advice, CalculationResult, ClosureEngine, NarrativeRequest, RiskLevel, advise};
pub use config::SnowDayConfig;
pub use error::SnowDayError;
pub use forecast::{FORECAST_HOURS, ForecastProjector};
pub use location_resolver::LocationResolver;
pub use models::{
    DistrictType, ForecastPoint, ForecastSummary, LocationClassification, RegionCategory,
    WeatherObservation, WeightConfig, WeightPreset,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SnowDayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
