//! User-adjustable factor weights and named presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SnowDayError;

/// Upper bound of each slider
pub const MAX_WEIGHT: f64 = 10.0;

/// Relative importance of each factor family.
///
/// Weights are only ever used as proportions of their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(default = "default_temperature_weight")]
    pub temperature: f64,
    #[serde(default = "default_snowfall_weight")]
    pub snowfall: f64,
    #[serde(default = "default_wind_speed_weight")]
    pub wind_speed: f64,
    #[serde(default = "default_school_district_weight")]
    pub school_district: f64,
}

/// Weights scaled so they sum to one (or all zero)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeights {
    pub temperature: f64,
    pub snowfall: f64,
    pub wind_speed: f64,
    pub school_district: f64,
}

fn default_temperature_weight() -> f64 {
    3.0
}

fn default_snowfall_weight() -> f64 {
    4.0
}

fn default_wind_speed_weight() -> f64 {
    2.0
}

fn default_school_district_weight() -> f64 {
    1.0
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature_weight(),
            snowfall: default_snowfall_weight(),
            wind_speed: default_wind_speed_weight(),
            school_district: default_school_district_weight(),
        }
    }
}

impl WeightConfig {
    #[must_use]
    pub fn new(temperature: f64, snowfall: f64, wind_speed: f64, school_district: f64) -> Self {
        Self {
            temperature,
            snowfall,
            wind_speed,
            school_district,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.temperature + self.snowfall + self.wind_speed + self.school_district
    }

    /// Divide every weight by the total. A zero (or non-positive) total
    /// yields all-zero weights instead of dividing by zero.
    #[must_use]
    pub fn normalized(&self) -> NormalizedWeights {
        let total = self.total();
        if total.is_nan() || total <= 0.0 {
            return NormalizedWeights::zero();
        }
        NormalizedWeights {
            temperature: self.temperature / total,
            snowfall: self.snowfall / total,
            wind_speed: self.wind_speed / total,
            school_district: self.school_district / total,
        }
    }

    /// Share of each weight in percent, as shown on the distribution bar
    #[must_use]
    pub fn distribution(&self) -> NormalizedWeights {
        self.normalized().scaled(100.0)
    }

    /// Every weight must be finite and within the slider range
    pub fn validate(&self) -> crate::Result<()> {
        let named = [
            ("temperature", self.temperature),
            ("snowfall", self.snowfall),
            ("wind speed", self.wind_speed),
            ("school district", self.school_district),
        ];
        for (name, value) in named {
            if !value.is_finite() || !(0.0..=MAX_WEIGHT).contains(&value) {
                return Err(SnowDayError::validation(format!(
                    "{name} weight must be between 0 and {MAX_WEIGHT}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl NormalizedWeights {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            temperature: 0.0,
            snowfall: 0.0,
            wind_speed: 0.0,
            school_district: 0.0,
        }
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            temperature: self.temperature * factor,
            snowfall: self.snowfall * factor,
            wind_speed: self.wind_speed * factor,
            school_district: self.school_district * factor,
        }
    }
}

/// Parses "temperature,snowfall,wind,district", e.g. "3,4,2,1"
impl FromStr for WeightConfig {
    type Err = SnowDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    SnowDayError::validation(format!("'{}' is not a valid weight", part.trim()))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let &[temperature, snowfall, wind_speed, school_district] = values.as_slice() else {
            return Err(SnowDayError::validation(format!(
                "expected 4 comma-separated weights, got {}",
                values.len()
            )));
        };

        let weights = Self::new(temperature, snowfall, wind_speed, school_district);
        weights.validate()?;
        Ok(weights)
    }
}

/// Named weight presets offered next to the sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightPreset {
    Default,
    Conservative,
    Balanced,
    SnowSensitive,
}

impl WeightPreset {
    pub const ALL: [WeightPreset; 4] = [
        WeightPreset::Default,
        WeightPreset::Conservative,
        WeightPreset::Balanced,
        WeightPreset::SnowSensitive,
    ];

    #[must_use]
    pub fn weights(self) -> WeightConfig {
        match self {
            WeightPreset::Default => WeightConfig::default(),
            WeightPreset::Conservative => WeightConfig::new(3.5, 3.0, 2.0, 1.5),
            WeightPreset::Balanced => WeightConfig::new(2.5, 2.5, 2.5, 2.5),
            WeightPreset::SnowSensitive => WeightConfig::new(1.5, 6.0, 1.5, 1.0),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WeightPreset::Default => "default",
            WeightPreset::Conservative => "conservative",
            WeightPreset::Balanced => "balanced",
            WeightPreset::SnowSensitive => "snow-sensitive",
        }
    }
}

impl fmt::Display for WeightPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightPreset {
    type Err = SnowDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeightPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SnowDayError::validation(format!(
                    "unknown preset '{s}'. Must be one of: default, conservative, balanced, snow-sensitive"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_weights() {
        let weights = WeightConfig::default();
        assert_eq!(weights.total(), 10.0);
        let normalized = weights.normalized();
        assert!((normalized.temperature - 0.3).abs() < 1e-12);
        assert!((normalized.snowfall - 0.4).abs() < 1e-12);
        assert!((normalized.wind_speed - 0.2).abs() < 1e-12);
        assert!((normalized.school_district - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weights_normalize_to_zero() {
        let weights = WeightConfig::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(weights.normalized(), NormalizedWeights::zero());
        assert_eq!(weights.distribution(), NormalizedWeights::zero());
    }

    #[test]
    fn test_distribution_sums_to_hundred() {
        let distribution = WeightPreset::Conservative.weights().distribution();
        let sum = distribution.temperature
            + distribution.snowfall
            + distribution.wind_speed
            + distribution.school_district;
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((distribution.temperature - 35.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(10.5, 1.0)]
    #[case(-0.1, 1.0)]
    #[case(f64::NAN, 1.0)]
    #[case(1.0, f64::INFINITY)]
    fn test_out_of_range_weights_rejected(#[case] temperature: f64, #[case] district: f64) {
        let weights = WeightConfig::new(temperature, 1.0, 1.0, district);
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_parse_weights() {
        let weights: WeightConfig = "3, 4, 2, 1".parse().unwrap();
        assert_eq!(weights, WeightConfig::default());

        assert!("3,4,2".parse::<WeightConfig>().is_err());
        assert!("3,4,x,1".parse::<WeightConfig>().is_err());
        assert!("3,4,2,11".parse::<WeightConfig>().is_err());
    }

    #[rstest]
    #[case("default", WeightPreset::Default)]
    #[case("Conservative", WeightPreset::Conservative)]
    #[case("balanced", WeightPreset::Balanced)]
    #[case("snow-sensitive", WeightPreset::SnowSensitive)]
    fn test_parse_preset(#[case] input: &str, #[case] expected: WeightPreset) {
        assert_eq!(input.parse::<WeightPreset>().unwrap(), expected);
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in WeightPreset::ALL {
            assert!(preset.weights().validate().is_ok(), "{preset}");
        }
        assert!("aggressive".parse::<WeightPreset>().is_err());
    }
}
