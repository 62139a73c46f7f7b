//! Data models for the snow day calculator
//!
//! This module contains the core domain models organized by concern:
//! - Weather: raw readings fed into the engine
//! - Location: region and district classification
//! - Weights: user-adjustable factor weights and presets
//! - Forecast: hourly outlook points and their summary

pub mod forecast;
pub mod location;
pub mod weather;
pub mod weights;

// Re-export all public types for convenient access
pub use forecast::{ForecastPoint, ForecastSummary};
pub use location::{DistrictType, LocationClassification, RegionCategory};
pub use weather::{WeatherObservation, wind_chill};
pub use weights::{MAX_WEIGHT, NormalizedWeights, WeightConfig, WeightPreset};
