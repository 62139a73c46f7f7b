//! Weather observation model and display methods

use rand::RngExt;
use serde::{Deserialize, Serialize};

use crate::SnowDayError;

use super::RegionCategory;

/// Wind chill is only defined at or below this temperature (°F)
const WIND_CHILL_MAX_TEMPERATURE: f64 = 50.0;
/// Wind chill is only defined at or above this wind speed (mph)
const WIND_CHILL_MIN_WIND: f64 = 3.0;

/// Weather readings for a single calculation, already resolved by the caller
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WeatherObservation {
    /// Temperature in °F
    pub temperature: f64,
    /// Expected snowfall in inches
    pub snowfall: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
}

impl WeatherObservation {
    #[must_use]
    pub fn new(temperature: f64, snowfall: f64, wind_speed: f64) -> Self {
        Self {
            temperature,
            snowfall,
            wind_speed,
        }
    }

    /// Apparent temperature using the NWS wind chill approximation
    #[must_use]
    pub fn apparent_temperature(&self) -> f64 {
        wind_chill(self.temperature, self.wind_speed)
    }

    /// Reject readings the engine cannot meaningfully score
    pub fn validate(&self) -> crate::Result<()> {
        if !self.temperature.is_finite() {
            return Err(SnowDayError::validation("temperature must be a finite number"));
        }
        if !self.snowfall.is_finite() || self.snowfall < 0.0 {
            return Err(SnowDayError::validation(
                "snowfall must be a finite, non-negative number of inches",
            ));
        }
        if !self.wind_speed.is_finite() || self.wind_speed < 0.0 {
            return Err(SnowDayError::validation(
                "wind speed must be a finite, non-negative number of mph",
            ));
        }
        Ok(())
    }

    /// Format temperature with unit, adding the felt temperature when wind changes it
    #[must_use]
    pub fn format_temperature(&self) -> String {
        let apparent = self.apparent_temperature();
        if apparent == self.temperature {
            format!("{}°F", self.temperature)
        } else {
            // adding zero turns a rounded -0 into 0
            format!("{}°F (feels like {}°F)", self.temperature, apparent.round() + 0.0)
        }
    }

    #[must_use]
    pub fn format_snowfall(&self) -> String {
        format!("{} inches", self.snowfall)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} mph", self.wind_speed)
    }

    /// Synthetic readings used when no live weather is available.
    ///
    /// Canadian locations skew colder and windier. Snowfall is rounded to
    /// half inches, temperature and wind to whole units.
    pub fn demo<R: RngExt + ?Sized>(region: RegionCategory, rng: &mut R) -> Self {
        let (temperature, snowfall, wind_speed) = match region {
            RegionCategory::Canadian => (
                rng.random_range(-15.0..15.0_f64),
                rng.random_range(0.0..10.0_f64),
                rng.random_range(0.0..30.0_f64),
            ),
            _ => (
                rng.random_range(-10.0..30.0_f64),
                rng.random_range(0.0..8.0_f64),
                rng.random_range(0.0..25.0_f64),
            ),
        };

        Self {
            temperature: temperature.round(),
            snowfall: round_to_half(snowfall),
            wind_speed: wind_speed.round(),
        }
    }

    /// Fixed readings returned when the weather collaborator fails outright
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(28.0, 3.0, 12.0)
    }
}

/// Apparent temperature in °F for a raw temperature (°F) and wind speed (mph)
#[must_use]
pub fn wind_chill(temperature: f64, wind_speed: f64) -> f64 {
    if temperature > WIND_CHILL_MAX_TEMPERATURE || wind_speed < WIND_CHILL_MIN_WIND {
        return temperature;
    }
    let wind_term = wind_speed.powf(0.16);
    35.74 + 0.6215 * temperature - 35.75 * wind_term + 0.4275 * temperature * wind_term
}

fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}
