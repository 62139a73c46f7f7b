//! Closure probability engine
//!
//! Converts one weather observation, a postal code and a set of factor
//! weights into a closure probability:
//!
//! 1. score the five severity factors (wind chill feeds temperature only)
//! 2. combine them into a base probability (worst factor plus average)
//! 3. scale by the region and district multipliers
//! 4. raise to any hard floor triggered by dangerous combinations
//! 5. weight the factor families and scale by the multipliers again
//! 6. hold deep cold with heavy snow at its floor whatever the weights
//! 7. clamp to `[0, 98]`, never claiming certainty

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::factors::{FactorScores, is_freezing_rain};
use super::risk::RiskLevel;
use crate::location_resolver::LocationResolver;
use crate::models::{LocationClassification, WeatherObservation, WeightConfig};

/// Upper bound of any reported probability
pub const MAX_PROBABILITY: f64 = 98.0;

/// Share of the base probability credited to the school district family
const DISTRICT_BASE_SHARE: f64 = 0.2;
/// Share of the visibility score credited to the wind family
const VISIBILITY_WIND_SHARE: f64 = 0.5;

/// Weighted points each factor family adds to the probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContributions {
    pub temperature: f64,
    pub snowfall: f64,
    pub wind_speed: f64,
    pub school_district: f64,
}

impl FactorContributions {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.temperature + self.snowfall + self.wind_speed + self.school_district
    }

    /// Each contribution as a percentage of `probability`; all zero when it is zero
    #[must_use]
    pub fn shares_of(&self, probability: f64) -> FactorContributions {
        let share = |value: f64| {
            if probability > 0.0 {
                value / probability * 100.0
            } else {
                0.0
            }
        };
        FactorContributions {
            temperature: share(self.temperature),
            snowfall: share(self.snowfall),
            wind_speed: share(self.wind_speed),
            school_district: share(self.school_district),
        }
    }
}

/// Human-readable readings, e.g. "10°F (feels like -11°F)"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDescriptions {
    pub temperature: String,
    pub snowfall: String,
    pub wind_speed: String,
}

/// Immutable snapshot of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Displayed closure probability (0-98)
    pub probability: u8,
    /// Unrounded final probability
    pub raw_probability: f64,
    /// Sum of the factor contributions before the final multipliers
    pub weighted_probability: f64,
    /// Base probability after multipliers and hard floors
    pub base_probability: f64,
    pub risk: RiskLevel,
    pub recommendation: String,
    pub factors: FactorScores,
    pub factor_contributions: FactorContributions,
    pub descriptions: FactorDescriptions,
    pub observation: WeatherObservation,
    pub applied_weights: WeightConfig,
    pub total_weight: f64,
    pub classification: LocationClassification,
    /// e.g. "US Location (12345) (Urban District)"
    pub location: String,
}

impl CalculationResult {
    /// Contribution of each factor family as a percentage of the final probability
    #[must_use]
    pub fn contribution_shares(&self) -> FactorContributions {
        self.factor_contributions.shares_of(self.raw_probability)
    }
}

/// Closure probability engine
pub struct ClosureEngine;

impl ClosureEngine {
    /// Calculate the closure probability for a postal code
    #[must_use]
    pub fn compute(
        observation: &WeatherObservation,
        postal_code: &str,
        weights: &WeightConfig,
    ) -> CalculationResult {
        Self::compute_named(observation, postal_code, weights, None)
    }

    /// Same as [`ClosureEngine::compute`], labelling the result with the
    /// location name supplied by the weather service when there is one
    #[instrument(level = "debug", skip(weights))]
    #[must_use]
    pub fn compute_named(
        observation: &WeatherObservation,
        postal_code: &str,
        weights: &WeightConfig,
        location_name: Option<&str>,
    ) -> CalculationResult {
        let classification = LocationResolver::classify(postal_code);
        let multiplier = classification.multiplier();
        let factors = FactorScores::score(observation);
        let floor = hard_floor(observation);

        let mut base_probability = factors.base_probability() * multiplier;
        if let Some(floor) = floor {
            base_probability = base_probability.max(floor);
        }

        let normalized = weights.normalized();
        let factor_contributions = FactorContributions {
            temperature: factors.temperature * normalized.temperature,
            snowfall: factors.snowfall * normalized.snowfall,
            wind_speed: (factors.wind + factors.visibility * VISIBILITY_WIND_SHARE)
                * normalized.wind_speed,
            school_district: base_probability * DISTRICT_BASE_SHARE * normalized.school_district,
        };
        let weighted_probability = factor_contributions.total();

        let mut raw_probability = weighted_probability * multiplier;
        if let Some(floor) = deep_cold_floor(observation) {
            raw_probability = raw_probability.max(floor);
        }
        let raw_probability = raw_probability.clamp(0.0, MAX_PROBABILITY);
        let probability = raw_probability.round() as u8;

        let risk = RiskLevel::from_probability(raw_probability);
        let name = location_name
            .map(str::to_string)
            .unwrap_or_else(|| classification.default_name(postal_code.trim()));

        debug!(
            "Scored {:?}: base {:.1}, weighted {:.1}, final {}%",
            factors.as_array(),
            base_probability,
            weighted_probability,
            probability
        );

        CalculationResult {
            probability,
            raw_probability,
            weighted_probability,
            base_probability,
            risk,
            recommendation: risk.recommendation(),
            factors,
            factor_contributions,
            descriptions: FactorDescriptions {
                temperature: observation.format_temperature(),
                snowfall: observation.format_snowfall(),
                wind_speed: observation.format_wind(),
            },
            observation: *observation,
            applied_weights: *weights,
            total_weight: weights.total(),
            classification,
            location: classification.label(&name),
        }
    }
}

/// Deep cold with heavy snow
const DEEP_COLD_FLOOR: f64 = 90.0;

/// Floor that also binds the final probability. Only deep cold with heavy
/// snow qualifies; the other floors shape the base probability alone.
#[must_use]
pub fn deep_cold_floor(observation: &WeatherObservation) -> Option<f64> {
    (observation.temperature < -10.0 && observation.snowfall > 6.0).then_some(DEEP_COLD_FLOOR)
}

/// Lowest base probability allowed for dangerous combinations, if any apply
#[must_use]
pub fn hard_floor(observation: &WeatherObservation) -> Option<f64> {
    let WeatherObservation {
        temperature,
        snowfall,
        wind_speed,
    } = *observation;

    let floors = [
        (deep_cold_floor(observation).is_some(), DEEP_COLD_FLOOR),
        // blizzard
        (wind_speed > 30.0 && snowfall > 2.0, 85.0),
        (is_freezing_rain(temperature, snowfall), 80.0),
    ];

    floors
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, floor)| floor)
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DistrictType, RegionCategory};

    #[test]
    fn test_urban_northern_scenario() {
        let observation = WeatherObservation::new(10.0, 5.0, 25.0);
        let result = ClosureEngine::compute(&observation, "12345", &WeightConfig::default());

        assert_eq!(result.classification.region, RegionCategory::NorthernUs);
        assert_eq!(result.classification.district, DistrictType::Urban);
        assert_eq!(result.factors.as_array(), [35.0, 65.0, 45.0, 90.0, 50.0]);
        // 76.8 * 0.8 * 0.8
        assert!((result.base_probability - 49.152).abs() < 1e-9);

        let contributions = result.factor_contributions;
        assert!((contributions.temperature - 10.5).abs() < 1e-9);
        assert!((contributions.snowfall - 26.0).abs() < 1e-9);
        assert!((contributions.wind_speed - 18.0).abs() < 1e-9);
        assert!((contributions.school_district - 0.98304).abs() < 1e-9);
        assert!((result.weighted_probability - 55.48304).abs() < 1e-9);

        assert!((result.raw_probability - 35.509_145_6).abs() < 1e-6);
        assert_eq!(result.probability, 36);
        assert_eq!(result.risk, RiskLevel::LowToModerate);
        assert_eq!(
            result.recommendation,
            "Low to Moderate Risk - Prepare for potential closure"
        );
        assert_eq!(result.location, "US Location (12345) (Urban District)");
        assert_eq!(result.descriptions.temperature, "10°F (feels like -11°F)");
    }

    #[test]
    fn test_rural_northern_scenario() {
        let observation = WeatherObservation::new(10.0, 5.0, 25.0);
        let result = ClosureEngine::compute(&observation, "05401", &WeightConfig::default());

        assert_eq!(result.classification.district, DistrictType::Rural);
        // 76.8 * 1.04
        assert!((result.base_probability - 79.872).abs() < 1e-9);
        assert!((result.raw_probability - 58.341_337_6).abs() < 1e-6);
        assert_eq!(result.probability, 58);
        assert_eq!(result.risk, RiskLevel::Moderate);
    }

    #[test]
    fn test_canadian_code_uses_canadian_multiplier() {
        let observation = WeatherObservation::new(10.0, 5.0, 25.0);
        let result = ClosureEngine::compute(&observation, "K1A 0A6", &WeightConfig::default());

        assert_eq!(result.classification.region, RegionCategory::Canadian);
        assert_eq!(result.classification.district, DistrictType::Suburban);
        assert!((result.base_probability - 76.8 * 0.7).abs() < 1e-9);
        assert_eq!(result.location, "Canadian Location (K1A 0A6) (Suburban District)");
    }

    #[test]
    fn test_zero_weights() {
        let observation = WeatherObservation::new(10.0, 5.0, 25.0);
        let weights = WeightConfig::new(0.0, 0.0, 0.0, 0.0);
        let result = ClosureEngine::compute(&observation, "60601", &weights);

        assert_eq!(result.weighted_probability, 0.0);
        assert_eq!(result.probability, 0);
        assert_eq!(result.total_weight, 0.0);
        assert_eq!(result.contribution_shares().total(), 0.0);
    }

    #[test]
    fn test_deep_cold_floor_survives_skewed_weights() {
        let observation = WeatherObservation::new(-15.0, 7.0, 5.0);
        assert_eq!(hard_floor(&observation), Some(90.0));

        for weights in [
            WeightConfig::new(0.0, 0.0, 0.0, 10.0),
            WeightConfig::new(0.0, 0.0, 10.0, 0.0),
            WeightConfig::new(0.0, 0.0, 0.0, 0.0),
            WeightConfig::default(),
        ] {
            let result = ClosureEngine::compute(&observation, "K1A 0A6", &weights);
            assert!(result.base_probability >= 90.0);
            assert!(result.probability >= 90, "{weights:?} gave {}", result.probability);
        }
    }

    #[test]
    fn test_freezing_rain_floor_only_lifts_the_base() {
        let observation = WeatherObservation::new(30.0, 1.0, 5.0);
        let result = ClosureEngine::compute(&observation, "30301", &WeightConfig::default());

        assert_eq!(result.factors.ice, 70.0);
        // 50.4 * 1.4 = 70.56, raised to 80
        assert_eq!(result.base_probability, 80.0);
        assert!((result.factor_contributions.school_district - 1.6).abs() < 1e-9);
        // (3 + 10 + 0 + 1.6) * 1.4
        assert!((result.raw_probability - 20.44).abs() < 1e-9);
        assert_eq!(result.probability, 20);
        assert_eq!(result.risk, RiskLevel::Low);
    }

    #[test]
    fn test_trace_of_snow_at_freezing_stays_low() {
        let observation = WeatherObservation::new(32.0, 0.1, 0.0);
        assert_eq!(hard_floor(&observation), Some(80.0));
        assert_eq!(deep_cold_floor(&observation), None);

        let result = ClosureEngine::compute(&observation, "60601", &WeightConfig::default());
        assert!((result.weighted_probability - 6.6).abs() < 1e-9);
        assert!((result.raw_probability - 5.28).abs() < 1e-9);
        assert_eq!(result.probability, 5);
        assert_eq!(result.risk, RiskLevel::VeryLow);
    }

    #[test]
    fn test_blizzard_floor_does_not_bind_the_final_probability() {
        let observation = WeatherObservation::new(20.0, 3.0, 35.0);
        let wind_blind = WeightConfig::new(10.0, 0.0, 0.0, 0.0);
        let result = ClosureEngine::compute(&observation, "60601", &wind_blind);

        assert_eq!(result.base_probability, 85.0);
        // temperature 20 scores 20, * 0.8
        assert!((result.raw_probability - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_floors_take_the_maximum() {
        // blizzard and deep cold at once
        let observation = WeatherObservation::new(-20.0, 8.0, 35.0);
        assert_eq!(hard_floor(&observation), Some(90.0));

        let blizzard = WeatherObservation::new(20.0, 3.0, 35.0);
        assert_eq!(hard_floor(&blizzard), Some(85.0));

        assert_eq!(hard_floor(&WeatherObservation::new(40.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_probability_never_exceeds_ceiling() {
        let observation = WeatherObservation::new(-40.0, 12.0, 50.0);
        let snow_only = WeightConfig::new(0.0, 10.0, 0.0, 0.0);
        let result = ClosureEngine::compute(&observation, "30301", &snow_only);

        assert_eq!(result.raw_probability, MAX_PROBABILITY);
        assert_eq!(result.probability, 98);
        assert_eq!(result.risk, RiskLevel::ExtremelyHigh);
    }

    #[test]
    fn test_probability_bounds_over_grid() {
        let codes = ["K1A 0A6", "12345", "05401", "30301", "60601", "garbage"];
        for temperature in [-50.0, -25.0, -10.5, 0.0, 28.0, 32.0, 60.0] {
            for snowfall in [0.0, 0.5, 2.0, 6.5, 20.0] {
                for wind_speed in [0.0, 3.0, 15.0, 31.0, 70.0] {
                    let observation = WeatherObservation::new(temperature, snowfall, wind_speed);
                    for code in codes {
                        let result =
                            ClosureEngine::compute(&observation, code, &WeightConfig::default());
                        assert!((0.0..=MAX_PROBABILITY).contains(&result.raw_probability));
                        assert!(result.probability <= 98);
                    }
                }
            }
        }
    }

    #[test]
    fn test_location_name_from_weather_service() {
        let observation = WeatherObservation::new(20.0, 1.0, 5.0);
        let result = ClosureEngine::compute_named(
            &observation,
            "10001",
            &WeightConfig::default(),
            Some("New York, US"),
        );
        assert_eq!(result.location, "New York, US (Urban District)");
    }

    #[test]
    fn test_contribution_shares() {
        let observation = WeatherObservation::new(10.0, 5.0, 25.0);
        let result = ClosureEngine::compute(&observation, "12345", &WeightConfig::default());
        let shares = result.contribution_shares();
        // contributions are measured before the final multiplier
        assert!((shares.snowfall - 26.0 / result.raw_probability * 100.0).abs() < 1e-9);
        assert!(shares.total() > 100.0);
    }
}
