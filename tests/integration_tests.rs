//! Integration tests for the SnowDay library and HTTP surface

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{FixedOffset, TimeZone};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use snowday::{
    ClosureEngine, DistrictType, FORECAST_HOURS, ForecastProjector, RegionCategory, RiskLevel,
    SnowDayConfig, WeatherObservation, WeightConfig, WeightPreset, advise, web,
};

/// Deep cold with heavy snow holds its floor whatever the postal code
#[rstest]
#[case("12345")]
#[case("05401")]
#[case("30301")]
#[case("K1A 0A6")]
#[case("not a code")]
fn test_deep_cold_heavy_snow_is_always_serious(#[case] postal_code: &str) {
    let observation = WeatherObservation::new(-15.0, 8.0, 20.0);
    let result = ClosureEngine::compute(&observation, postal_code, &WeightConfig::default());

    assert!(result.probability >= 90, "{postal_code} gave {}", result.probability);
    assert!(result.risk >= RiskLevel::ExtremelyHigh);
}

#[test]
fn test_calculation_through_to_advice() {
    let observation = WeatherObservation::new(10.0, 5.0, 25.0);
    let result = ClosureEngine::compute(&observation, "05401", &WeightConfig::default());

    assert_eq!(result.classification.district, DistrictType::Rural);
    assert_eq!(result.classification.region, RegionCategory::NorthernUs);
    assert_eq!(result.probability, 58);
    assert_eq!(result.risk, RiskLevel::Moderate);
    assert_eq!(result.location, "US Location (05401) (Rural District)");

    let titles: Vec<String> = advise(&result).into_iter().map(|a| a.title).collect();
    assert!(titles.contains(&"Extreme Cold Precautions".to_string()));
    assert!(titles.contains(&"Rural District Alert".to_string()));
    assert!(!titles.contains(&"Prepare for School Closure".to_string()));
}

#[test]
fn test_presets_shift_the_estimate() {
    let observation = WeatherObservation::new(35.0, 7.0, 5.0);
    let snow_heavy = ClosureEngine::compute(
        &observation,
        "60601",
        &WeightPreset::SnowSensitive.weights(),
    );
    let conservative = ClosureEngine::compute(
        &observation,
        "60601",
        &WeightPreset::Conservative.weights(),
    );

    assert!(snow_heavy.raw_probability > conservative.raw_probability);
}

#[test]
fn test_outlook_from_a_calculation() {
    let observation = WeatherObservation::new(20.0, 4.0, 15.0);
    let result = ClosureEngine::compute(&observation, "48201", &WeightConfig::default());

    let start = FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 1, 5, 6, 0, 0)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(2026);
    let (points, summary) =
        ForecastProjector::project_with_summary(result.raw_probability, start, &mut rng);

    assert_eq!(points.len(), FORECAST_HOURS);
    let summary = summary.unwrap();
    assert!(points.iter().any(|p| p.probability == summary.peak_probability));
    assert!(summary.average_probability <= summary.peak_probability);
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = web::app(SnowDayConfig::default())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_calculate_rural_scenario() {
    let (status, body) = send(post(
        "/api/calculate",
        json!({
            "zipCode": "05401",
            "weather": { "temperature": 10.0, "snowfall": 5.0, "windSpeed": 25.0 },
            "weights": { "temperature": 3.0, "snowfall": 4.0, "windSpeed": 2.0, "schoolDistrict": 1.0 }
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["probability"], 58);
    assert_eq!(body["result"]["totalWeight"], 10.0);
    assert_eq!(body["result"]["weightDistribution"]["snowfall"], 40.0);
    assert_eq!(body["narrative"]["schoolDistrict"], "rural");
    assert_eq!(body["narrative"]["probability"], 58);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 48);
}

#[tokio::test]
async fn test_api_zero_weights_give_zero() {
    let (status, body) = send(post(
        "/api/calculate",
        json!({
            "zipCode": "12345",
            "weather": { "temperature": 35.0, "snowfall": 1.0, "windSpeed": 5.0 },
            "weights": { "temperature": 0.0, "snowfall": 0.0, "windSpeed": 0.0, "schoolDistrict": 0.0 }
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["probability"], 0);
    assert_eq!(body["result"]["contributionShares"]["snowfall"], 0.0);
}

#[tokio::test]
async fn test_api_health_is_nested_under_api() {
    let (status, body) = send(
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], snowday::VERSION);
}
