//! Severity factor ladders
//!
//! Each factor maps raw readings to a 0-100 severity score using fixed
//! breakpoints. Ladders are evaluated top-down and the first matching rung
//! wins; every ladder ends in a score of 0.

use serde::{Deserialize, Serialize};

use crate::models::WeatherObservation;

/// Weight of the single worst factor in the base probability
const MAX_FACTOR_SHARE: f64 = 0.6;
/// Weight of the factor average in the base probability
const MEAN_FACTOR_SHARE: f64 = 0.4;

/// Severity scores for one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub temperature: f64,
    pub snowfall: f64,
    pub wind: f64,
    /// Derived from wind and snowfall together
    pub visibility: f64,
    pub ice: f64,
}

impl FactorScores {
    /// Score every factor for an observation
    #[must_use]
    pub fn score(observation: &WeatherObservation) -> Self {
        let WeatherObservation {
            temperature,
            snowfall,
            wind_speed,
        } = *observation;

        Self {
            temperature: temperature_factor(temperature, observation.apparent_temperature()),
            snowfall: snowfall_factor(snowfall),
            wind: wind_factor(wind_speed),
            visibility: visibility_factor(wind_speed, snowfall),
            ice: ice_factor(temperature, snowfall, wind_speed),
        }
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.temperature,
            self.snowfall,
            self.wind,
            self.visibility,
            self.ice,
        ]
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.as_array().into_iter().fold(0.0, f64::max)
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        let scores = self.as_array();
        scores.iter().sum::<f64>() / scores.len() as f64
    }

    /// Rewards the single worst condition while still reflecting overall severity
    #[must_use]
    pub fn base_probability(&self) -> f64 {
        self.max() * MAX_FACTOR_SHARE + self.mean() * MEAN_FACTOR_SHARE
    }
}

/// Temperature severity. Wind chill rungs take precedence over the raw ladder.
#[must_use]
pub fn temperature_factor(temperature: f64, apparent: f64) -> f64 {
    match (temperature, apparent) {
        (_, a) if a <= -25.0 => 95.0,
        (_, a) if a <= -15.0 => 85.0,
        (t, _) if t <= -20.0 => 90.0,
        (t, _) if t <= -10.0 => 75.0,
        (t, _) if t <= 0.0 => 55.0,
        (t, _) if t <= 15.0 => 35.0,
        (t, _) if t <= 25.0 => 20.0,
        (t, _) if t <= 32.0 => 10.0,
        _ => 0.0,
    }
}

/// Snowfall severity in inches
#[must_use]
pub fn snowfall_factor(snowfall: f64) -> f64 {
    match snowfall {
        s if s >= 8.0 => 95.0,
        s if s >= 6.0 => 85.0,
        s if s >= 4.0 => 65.0,
        s if s >= 2.0 => 40.0,
        s if s >= 1.0 => 25.0,
        s if s >= 0.5 => 15.0,
        s if s > 0.0 => 5.0,
        _ => 0.0,
    }
}

/// Wind severity in mph
#[must_use]
pub fn wind_factor(wind_speed: f64) -> f64 {
    match wind_speed {
        w if w >= 40.0 => 85.0,
        w if w >= 30.0 => 70.0,
        w if w >= 20.0 => 45.0,
        w if w >= 15.0 => 25.0,
        w if w >= 10.0 => 10.0,
        _ => 0.0,
    }
}

/// Blowing-snow visibility. Needs both wind and snow above joint thresholds.
#[must_use]
pub fn visibility_factor(wind_speed: f64, snowfall: f64) -> f64 {
    match (wind_speed, snowfall) {
        (w, s) if w >= 25.0 && s >= 2.0 => 90.0,
        (w, s) if w >= 15.0 && s >= 1.0 => 60.0,
        (w, s) if w >= 10.0 && s >= 0.5 => 30.0,
        _ => 0.0,
    }
}

/// Road ice severity
#[must_use]
pub fn ice_factor(temperature: f64, snowfall: f64, wind_speed: f64) -> f64 {
    if is_freezing_rain(temperature, snowfall) {
        70.0
    } else if temperature <= 32.0 && wind_speed >= 10.0 {
        // black ice
        50.0
    } else if temperature <= 25.0 {
        30.0
    } else {
        0.0
    }
}

/// Snow falling right around the freezing point
#[must_use]
pub fn is_freezing_rain(temperature: f64, snowfall: f64) -> bool {
    (28.0..=32.0).contains(&temperature) && snowfall > 0.0
}
