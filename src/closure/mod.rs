//! Closure probability module
//!
//! This module turns resolved weather readings into a school closure estimate:
//! - Severity factor ladders for temperature, snowfall, wind, visibility and ice
//! - The weighted probability engine with regional adjustments and hard floors
//! - Risk banding and recommendation text
//! - Preparation advice and the narrative service payload

pub mod advice;
pub mod engine;
pub mod factors;
pub mod narrative;
pub mod risk;

// Re-export commonly used types from submodules
pub use advice::{Advice, AdviceKind, Priority, advise};
pub use engine::{
    CalculationResult, ClosureEngine, FactorContributions, FactorDescriptions, MAX_PROBABILITY,
    deep_cold_floor, hard_floor,
};
pub use factors::FactorScores;
pub use narrative::NarrativeRequest;
pub use risk::RiskLevel;
