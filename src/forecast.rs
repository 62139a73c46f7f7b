//! 48-hour closure outlook
//!
//! A decorative trend around a fixed centre, not a weather model: every hour
//! takes the base probability and adds bounded random noise. Overnight hours
//! lean higher and the second day is noisier. The sequence is generated
//! lazily and regenerated on every call.

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use rand::RngExt;
use tracing::debug;

use crate::models::{ForecastPoint, ForecastSummary};

/// Number of hourly points in an outlook
pub const FORECAST_HOURS: usize = 48;

/// Lazy sequence of outlook points
pub struct ForecastProjection<'a, R: ?Sized> {
    base_probability: f64,
    start: DateTime<FixedOffset>,
    index: usize,
    rng: &'a mut R,
}

impl<R: RngExt + ?Sized> Iterator for ForecastProjection<'_, R> {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= FORECAST_HOURS {
            return None;
        }

        let offset = self.index;
        self.index += 1;

        let timestamp = self.start + Duration::hours(offset as i64);
        let hour = timestamp.hour();
        let is_today = offset < 24;

        let mut probability = self.base_probability;
        if is_overnight(hour) {
            probability += self.rng.random_range(-5.0..10.0_f64);
        }
        if !is_today {
            probability += self.rng.random_range(-10.0..10.0_f64);
        }
        probability += self.rng.random_range(-5.0..5.0_f64);

        Some(ForecastPoint {
            timestamp,
            probability: probability.clamp(0.0, 100.0).round() as u8,
            hour,
            is_today,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = FORECAST_HOURS - self.index;
        (remaining, Some(remaining))
    }
}

impl<R: RngExt + ?Sized> ExactSizeIterator for ForecastProjection<'_, R> {}

/// Forecast projection service
pub struct ForecastProjector;

impl ForecastProjector {
    /// Lazily project hourly points starting at `start`
    pub fn projection<R: RngExt + ?Sized>(
        base_probability: f64,
        start: DateTime<FixedOffset>,
        rng: &mut R,
    ) -> ForecastProjection<'_, R> {
        ForecastProjection {
            base_probability,
            start,
            index: 0,
            rng,
        }
    }

    /// Project all 48 hourly points
    pub fn project<R: RngExt + ?Sized>(
        base_probability: f64,
        start: DateTime<FixedOffset>,
        rng: &mut R,
    ) -> Vec<ForecastPoint> {
        let points: Vec<ForecastPoint> = Self::projection(base_probability, start, rng).collect();
        debug!(
            "Projected {} hourly points around {:.0}%",
            points.len(),
            base_probability
        );
        points
    }

    /// Project and summarise in one go
    pub fn project_with_summary<R: RngExt + ?Sized>(
        base_probability: f64,
        start: DateTime<FixedOffset>,
        rng: &mut R,
    ) -> (Vec<ForecastPoint>, Option<ForecastSummary>) {
        let points = Self::project(base_probability, start, rng);
        let summary = ForecastSummary::from_points(&points);
        (points, summary)
    }
}

/// 22:00 through 06:59 local time
fn is_overnight(hour: u32) -> bool {
    hour >= 22 || hour <= 6
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 1, 5, 15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_always_48_hourly_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = ForecastProjector::project(50.0, start(), &mut rng);

        assert_eq!(points.len(), FORECAST_HOURS);
        assert_eq!(points[0].timestamp, start());
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
        assert!(points[..24].iter().all(|p| p.is_today));
        assert!(points[24..].iter().all(|p| !p.is_today));
    }

    #[test]
    fn test_points_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for base in [0.0, 1.0, 36.0, 98.0, 100.0] {
            for _ in 0..50 {
                let points = ForecastProjector::project(base, start(), &mut rng);
                assert!(points.iter().all(|p| p.probability <= 100));
            }
        }
    }

    #[test]
    fn test_noise_is_bounded_per_hour() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let points = ForecastProjector::project(50.0, start(), &mut rng);
            for (index, point) in points.iter().enumerate() {
                let mut low = 45.0;
                let mut high = 55.0;
                if is_overnight(point.hour) {
                    low -= 5.0;
                    high += 10.0;
                }
                if index >= 24 {
                    low -= 10.0;
                    high += 10.0;
                }
                let probability = f64::from(point.probability);
                assert!(
                    (low..=high).contains(&probability),
                    "hour {index} gave {probability}, expected {low}..={high}"
                );
            }
        }
    }

    #[test]
    fn test_projection_is_lazy_and_exact_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut projection = ForecastProjector::projection(20.0, start(), &mut rng);
        assert_eq!(projection.len(), 48);

        let first = projection.next().unwrap();
        assert_eq!(first.hour, 15);
        assert_eq!(projection.len(), 47);
        assert_eq!(projection.count(), 47);
    }

    #[test]
    fn test_overnight_hours() {
        assert!(is_overnight(22));
        assert!(is_overnight(0));
        assert!(is_overnight(6));
        assert!(!is_overnight(7));
        assert!(!is_overnight(21));
    }

    #[test]
    fn test_summary_matches_points() {
        let mut rng = StdRng::seed_from_u64(9);
        let (points, summary) = ForecastProjector::project_with_summary(60.0, start(), &mut rng);
        let summary = summary.unwrap();
        let max = points.iter().map(|p| p.probability).max().unwrap();
        assert_eq!(summary.peak_probability, max);
    }
}
