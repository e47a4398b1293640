use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::hazard::models::{GridPoint, HazardRecord};
use crate::matrix::LookupError;
use crate::services::{HazardService, RiskAssessment, RiskCategory, RiskService};

#[derive(Clone)]
pub struct AppState {
    pub hazard_service: HazardService,
    pub risk_service: RiskService,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Grid cells available for lookup
    pub cells: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HazardQuery {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees; negative values are wrapped into 0-360
    pub lon: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RiskRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Business sector; unlisted sectors use the default weight
    #[serde(default = "default_sector")]
    pub sector: String,
}

fn default_sector() -> String {
    "Other".to_string()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RiskResponse {
    /// Coordinates of the matched grid cell
    pub location: GridPoint,
    pub sector: String,
    pub hazards: HazardRecord,
    pub risk_result: RiskAssessment,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn lookup_error(err: LookupError) -> ApiError {
    let status = match err {
        LookupError::NoData { .. } => StatusCode::NOT_FOUND,
        LookupError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
    };
    warn!("Lookup failed: {}", err);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_hazards, assess_risk),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        RiskRequest,
        RiskResponse,
        GridPoint,
        HazardRecord,
        RiskAssessment,
        RiskCategory
    )),
    tags((name = "hazards", description = "Rainfall hazard lookup and sector risk scoring"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/hazards", get(get_hazards))
        .route("/risk", post(assess_risk))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "hazards",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(state))]
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
        cells: state.hazard_service.cell_count(),
        loaded_at: state.hazard_service.loaded_at(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/hazards",
    tag = "hazards",
    params(HazardQuery),
    responses(
        (status = 200, description = "Hazard indicators for the enclosing grid cell", body = HazardRecord),
        (status = 400, description = "Coordinate out of range", body = ErrorResponse),
        (status = 404, description = "No preprocessed data for the coordinate", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_hazards(
    State(state): State<AppState>,
    Query(query): Query<HazardQuery>,
) -> Result<Json<HazardRecord>, ApiError> {
    debug!("Fetching hazards for {},{}", query.lat, query.lon);
    let record = state
        .hazard_service
        .get_hazards(query.lat, query.lon)
        .map_err(lookup_error)?;

    info!(
        "Retrieved hazards for cell {},{} (composite {:.4})",
        record.lat, record.lon, record.composite_hazard
    );
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/v1/risk",
    tag = "hazards",
    request_body = RiskRequest,
    responses(
        (status = 200, description = "Hazards and sector-weighted risk", body = RiskResponse),
        (status = 400, description = "Coordinate out of range", body = ErrorResponse),
        (status = 404, description = "No preprocessed data for the coordinate", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(sector = %request.sector))]
async fn assess_risk(
    State(state): State<AppState>,
    Json(request): Json<RiskRequest>,
) -> Result<Json<RiskResponse>, ApiError> {
    let hazards = state
        .hazard_service
        .get_hazards(request.latitude, request.longitude)
        .map_err(lookup_error)?;

    let risk_result = state
        .risk_service
        .assess(hazards.composite_hazard, &request.sector);

    info!(
        "Scored {} at {},{}: {:.4} ({:?})",
        request.sector, hazards.lat, hazards.lon, risk_result.final_score, risk_result.category
    );

    Ok(Json(RiskResponse {
        location: GridPoint::new(hazards.lat, hazards.lon),
        sector: request.sector,
        hazards,
        risk_result,
    }))
}
