use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{Access, ApiKeyGuard, API_KEY_HEADER};
use crate::domain::{ApplicationRecord, LoanApplication};
use crate::observability::metrics::{MetricsRegistry, TimingGuard};
use crate::rules::RuleSet;
use crate::storage::Storage;

use super::error::ApiError;
use super::request::LoanApplicationRequest;
use super::response::{ApplicationCreatedResponse, HealthResponse, SimulationResponse};

/// Shared application state.
pub struct AppState {
    /// Storage backend for persistence
    pub storage: Arc<dyn Storage>,

    /// API key check for the write routes
    pub guard: ApiKeyGuard,

    /// Underwriting rules
    pub rules: Arc<RuleSet>,

    /// Request counters
    pub metrics: Arc<MetricsRegistry>,

    /// Application start time
    pub start_time: Instant,
}

/// Create the application router.
///
/// `/simulate` and `POST /applications` sit behind the API key guard; the
/// health check, metrics and record lookup are open.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/simulate", post(handle_simulate))
        .route("/applications", post(handle_create_application))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .route("/applications/:id", get(handle_get_application))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reject requests whose `X-API-Key` does not match the configured secret.
async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.guard.authorize(presented) {
        Access::Allow => Ok(next.run(request).await),
        Access::Deny(reason) => {
            state.metrics.record_auth_denied();
            warn!(
                path = %request.uri().path(),
                reason = reason.as_str(),
                "Rejected request with bad API key"
            );
            Err(ApiError::Forbidden)
        }
    }
}

/// Parse and validate a JSON body into a typed application.
fn accept_application(
    state: &AppState,
    payload: Result<Json<LoanApplicationRequest>, JsonRejection>,
) -> Result<LoanApplication, ApiError> {
    let validated = payload
        .map_err(ApiError::from)
        .and_then(|Json(req)| req.validate().map_err(ApiError::from));

    if validated.is_err() {
        state.metrics.record_validation_error();
    }

    validated
}

/// Evaluate an application without saving it.
async fn handle_simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoanApplicationRequest>, JsonRejection>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let _timer = TimingGuard::new(&state.metrics);

    let application = accept_application(&state, payload)?;
    let decision = state.rules.evaluate(&application);
    state.metrics.record_decision(&decision);

    info!(
        decision = %decision.outcome,
        dti_ratio = %decision.dti_ratio,
        credit_score = application.credit_score().value(),
        "Simulation completed"
    );

    Ok(Json(SimulationResponse::new(&application, decision)))
}

/// Evaluate an application and persist the result.
async fn handle_create_application(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoanApplicationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApplicationCreatedResponse>), ApiError> {
    let _timer = TimingGuard::new(&state.metrics);

    let application = accept_application(&state, payload)?;
    let decision = state.rules.evaluate(&application);
    state.metrics.record_decision(&decision);

    let record = match state.storage.create(&application, &decision).await {
        Ok(record) => record,
        Err(e) => {
            state.metrics.record_storage_error();
            return Err(e.into());
        }
    };
    state.metrics.record_created();

    info!(
        id = record.id,
        decision = %record.decision,
        dti_ratio = %record.dti_ratio,
        "Application saved"
    );

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Fetch a saved application.
async fn handle_get_application(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApplicationRecord>, ApiError> {
    let _timer = TimingGuard::new(&state.metrics);

    let Path(id) = id.map_err(|rejection| {
        state.metrics.record_validation_error();
        ApiError::from(rejection)
    })?;

    match state.storage.get(id).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => {
            if !e.is_not_found() {
                state.metrics.record_storage_error();
            }
            Err(e.into())
        }
    }
}

/// Health check endpoint.
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// Metrics endpoint (Prometheus format).
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state
        .metrics
        .to_prometheus(state.start_time.elapsed().as_secs());

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        metrics,
    )
}
