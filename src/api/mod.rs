use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    SnowDayError,
    closure::{Advice, CalculationResult, ClosureEngine, NarrativeRequest, advise},
    config::SnowDayConfig,
    forecast::ForecastProjector,
    location_resolver::LocationResolver,
    models::{ForecastPoint, ForecastSummary, WeatherObservation, WeightConfig, WeightPreset},
};

/// Shared state behind every handler
pub struct AppState {
    pub config: SnowDayConfig,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWeather {
    pub temperature: f64,
    pub snowfall: f64,
    pub wind_speed: f64,
}

impl From<&ApiWeather> for WeatherObservation {
    fn from(weather: &ApiWeather) -> Self {
        WeatherObservation::new(weather.temperature, weather.snowfall, weather.wind_speed)
    }
}

impl From<&WeatherObservation> for ApiWeather {
    fn from(observation: &WeatherObservation) -> Self {
        Self {
            temperature: observation.temperature,
            snowfall: observation.snowfall,
            wind_speed: observation.wind_speed,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWeights {
    pub temperature: f64,
    pub snowfall: f64,
    pub wind_speed: f64,
    pub school_district: f64,
}

impl From<&ApiWeights> for WeightConfig {
    fn from(weights: &ApiWeights) -> Self {
        WeightConfig::new(
            weights.temperature,
            weights.snowfall,
            weights.wind_speed,
            weights.school_district,
        )
    }
}

impl From<&WeightConfig> for ApiWeights {
    fn from(weights: &WeightConfig) -> Self {
        Self {
            temperature: weights.temperature,
            snowfall: weights.snowfall,
            wind_speed: weights.wind_speed,
            school_district: weights.school_district,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[serde(default)]
    pub zip_code: String,
    pub weather: Option<ApiWeather>,
    pub weights: Option<ApiWeights>,
    /// Caller's offset from UTC, used for the outlook's clock
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFactors {
    pub temperature: f64,
    pub snowfall: f64,
    pub wind: f64,
    pub visibility: f64,
    pub ice: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult {
    pub probability: u8,
    pub risk: String,
    pub recommendation: String,
    pub location: String,
    pub region: String,
    pub district: String,
    pub weather: ApiWeather,
    pub descriptions: ApiDescriptions,
    pub factors: ApiFactors,
    pub factor_contributions: ApiWeights,
    pub contribution_shares: ApiWeights,
    pub applied_weights: ApiWeights,
    pub weight_distribution: ApiWeights,
    pub total_weight: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescriptions {
    pub temperature: String,
    pub snowfall: String,
    pub wind_speed: String,
}

impl From<&CalculationResult> for ApiResult {
    fn from(result: &CalculationResult) -> Self {
        let contributions = |c: crate::closure::FactorContributions| ApiWeights {
            temperature: c.temperature,
            snowfall: c.snowfall,
            wind_speed: c.wind_speed,
            school_district: c.school_district,
        };
        let distribution = result.applied_weights.distribution();

        Self {
            probability: result.probability,
            risk: result.risk.label().to_string(),
            recommendation: result.recommendation.clone(),
            location: result.location.clone(),
            region: result.classification.region.to_string(),
            district: result.classification.district.as_str().to_string(),
            weather: ApiWeather::from(&result.observation),
            descriptions: ApiDescriptions {
                temperature: result.descriptions.temperature.clone(),
                snowfall: result.descriptions.snowfall.clone(),
                wind_speed: result.descriptions.wind_speed.clone(),
            },
            factors: ApiFactors {
                temperature: result.factors.temperature,
                snowfall: result.factors.snowfall,
                wind: result.factors.wind,
                visibility: result.factors.visibility,
                ice: result.factors.ice,
            },
            factor_contributions: contributions(result.factor_contributions),
            contribution_shares: contributions(result.contribution_shares()),
            applied_weights: ApiWeights::from(&result.applied_weights),
            weight_distribution: ApiWeights {
                temperature: distribution.temperature,
                snowfall: distribution.snowfall,
                wind_speed: distribution.wind_speed,
                school_district: distribution.school_district,
            },
            total_weight: result.total_weight,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiForecastPoint {
    pub timestamp: String,
    pub label: String,
    pub probability: u8,
    pub hour: u32,
    pub is_today: bool,
}

impl ApiForecastPoint {
    fn new(point: &ForecastPoint, today: NaiveDate) -> Self {
        Self {
            timestamp: point.timestamp.to_rfc3339(),
            label: point.label(today),
            probability: point.probability,
            hour: point.hour,
            is_today: point.is_today,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiForecastSummary {
    pub peak_probability: u8,
    pub peak_at: String,
    pub average_probability: u8,
}

impl From<&ForecastSummary> for ApiForecastSummary {
    fn from(summary: &ForecastSummary) -> Self {
        Self {
            peak_probability: summary.peak_probability,
            peak_at: summary.peak_at.to_rfc3339(),
            average_probability: summary.average_probability,
        }
    }
}

#[derive(Serialize)]
pub struct CalculateResponse {
    pub result: ApiResult,
    pub forecast: Vec<ApiForecastPoint>,
    pub summary: Option<ApiForecastSummary>,
    pub advice: Vec<Advice>,
    pub narrative: NarrativeRequest,
}

impl CalculateResponse {
    #[must_use]
    pub fn new(
        zip_code: &str,
        result: &CalculationResult,
        points: &[ForecastPoint],
        summary: Option<&ForecastSummary>,
    ) -> Self {
        Self {
            result: ApiResult::from(result),
            forecast: api_points(points),
            summary: summary.map(ApiForecastSummary::from),
            advice: advise(result),
            narrative: NarrativeRequest::new(zip_code, result),
        }
    }
}

/// Points labelled against the date of the first point, which is "now"
/// on the caller's clock
fn api_points(points: &[ForecastPoint]) -> Vec<ApiForecastPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let today = first.timestamp.date_naive();
    points
        .iter()
        .map(|point| ApiForecastPoint::new(point, today))
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub base_probability: f64,
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<ApiForecastPoint>,
    pub summary: Option<ApiForecastSummary>,
}

impl ForecastResponse {
    #[must_use]
    pub fn new(points: &[ForecastPoint], summary: Option<&ForecastSummary>) -> Self {
        Self {
            forecast: api_points(points),
            summary: summary.map(ApiForecastSummary::from),
        }
    }
}

#[derive(Serialize)]
pub struct ApiPreset {
    pub name: String,
    pub weights: ApiWeights,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// JSON error body returned with a non-2xx status
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

pub struct ApiFailure(StatusCode, String);

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(ApiError { error: self.1 })).into_response()
    }
}

impl From<SnowDayError> for ApiFailure {
    fn from(error: SnowDayError) -> Self {
        let status = match error {
            SnowDayError::Validation { .. } => StatusCode::BAD_REQUEST,
            SnowDayError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiFailure(status, error.user_message())
    }
}

/// The outlook centres on the whole-number probability the user is shown
#[must_use]
pub fn outlook_base(result: &CalculationResult) -> f64 {
    f64::from(result.probability)
}

/// First hour of the outlook on the caller's clock. Without an offset the
/// server's local offset is used.
pub fn outlook_start(
    now: DateTime<Utc>,
    utc_offset_minutes: Option<i32>,
) -> crate::Result<DateTime<FixedOffset>> {
    match utc_offset_minutes {
        Some(minutes) => minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| now.with_timezone(&offset))
            .ok_or_else(|| {
                SnowDayError::validation(format!(
                    "utcOffsetMinutes must be within a day of UTC, got {minutes}"
                ))
            }),
        None => Ok(now.with_timezone(&Local).fixed_offset()),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/forecast", post(forecast))
        .route("/weights/presets", get(presets))
        .route("/health", get(health))
        .with_state(state)
}

#[instrument(level = "debug", skip_all)]
async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiFailure> {
    let zip_code = request.zip_code.trim();
    if zip_code.is_empty() {
        return Err(ApiFailure(
            StatusCode::BAD_REQUEST,
            "ZIP code is required".to_string(),
        ));
    }

    let observation = match &request.weather {
        Some(weather) => WeatherObservation::from(weather),
        None => {
            let region = LocationResolver::classify(zip_code).region;
            warn!("No weather supplied for {zip_code}, using demo conditions");
            WeatherObservation::demo(region, &mut rand::rng())
        }
    };
    observation.validate()?;

    let weights = request
        .weights
        .as_ref()
        .map(WeightConfig::from)
        .unwrap_or(state.config.weights);
    weights.validate()?;
    let start = outlook_start(Utc::now(), request.utc_offset_minutes)?;

    let result = ClosureEngine::compute(&observation, zip_code, &weights);
    let (points, summary) = ForecastProjector::project_with_summary(
        outlook_base(&result),
        start,
        &mut rand::rng(),
    );
    info!(
        "Calculated {}% closure probability for {}",
        result.probability, zip_code
    );

    Ok(Json(CalculateResponse::new(
        zip_code,
        &result,
        &points,
        summary.as_ref(),
    )))
}

#[instrument(level = "debug", skip_all)]
async fn forecast(Json(request): Json<ForecastRequest>) -> Result<Json<ForecastResponse>, ApiFailure> {
    if !(0.0..=100.0).contains(&request.base_probability) {
        return Err(SnowDayError::validation("baseProbability must be between 0 and 100").into());
    }

    let start = outlook_start(Utc::now(), request.utc_offset_minutes)?;

    let (points, summary) = ForecastProjector::project_with_summary(
        request.base_probability,
        start,
        &mut rand::rng(),
    );

    Ok(Json(ForecastResponse::new(&points, summary.as_ref())))
}

async fn presets() -> Json<Vec<ApiPreset>> {
    let presets = WeightPreset::ALL
        .iter()
        .map(|preset| ApiPreset {
            name: preset.as_str().to_string(),
            weights: ApiWeights::from(&preset.weights()),
        })
        .collect();
    Json(presets)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
