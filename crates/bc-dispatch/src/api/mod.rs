//! Beacon HTTP API
//!
//! HTTP API endpoints for:
//! - Alert dispatch (the bridge-style invocation boundary)
//! - Health and Kubernetes probes
//! - Prometheus metrics

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::warn;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use bc_common::AlertCategory;

use crate::{AlertDispatcher, DispatchError, SendAuthorization};

pub mod model;

use model::{DispatchRequest, DispatchResponse, ErrorBody};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<AlertDispatcher>,
    pub authorization: Arc<dyn SendAuthorization>,
    /// Prometheus render handle (absent in tests)
    pub metrics: Option<PrometheusHandle>,
}

/// Simple health response for basic health check
#[derive(Serialize, ToSchema)]
pub struct SimpleHealthResponse {
    /// Health status: UP
    pub status: String,
    /// Application version
    pub version: String,
}

/// Kubernetes probe response
#[derive(Serialize, ToSchema)]
pub struct ProbeResponse {
    /// Probe status: LIVE, READY
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Beacon Alert API",
        description = "Emergency-alert dispatch engine"
    ),
    paths(
        dispatch_handler,
        health_handler,
        liveness_probe,
        readiness_probe,
        metrics_handler,
    ),
    components(schemas(
        DispatchRequest,
        DispatchResponse,
        ErrorBody,
        SimpleHealthResponse,
        ProbeResponse,
    )),
    tags(
        (name = "alerts", description = "Alert dispatch endpoints"),
        (name = "health", description = "Health check endpoints"),
        (name = "monitoring", description = "Monitoring and metrics endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the full router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Alert dispatch
        .route("/api/alerts", post(dispatch_handler))
        // Basic health
        .route("/health", get(health_handler))
        // Kubernetes probes
        .route("/health/live", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message,
        }),
    )
        .into_response()
}

/// Dispatch an emergency alert
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "alerts",
    request_body = DispatchRequest,
    responses(
        (status = 200, description = "Alert delivered to at least one recipient", body = DispatchResponse),
        (status = 403, description = "Transport authorization missing", body = ErrorBody),
        (status = 404, description = "Unknown method name", body = ErrorBody),
        (status = 500, description = "No dispatch plan configured for the category", body = ErrorBody),
        (status = 502, description = "Every delivery failed", body = ErrorBody),
    )
)]
async fn dispatch_handler(
    State(state): State<AppState>,
    Json(request): Json<DispatchRequest>,
) -> Response {
    let category = match request.method.as_str() {
        "sendEmergencySMS" => AlertCategory::Standard,
        "triggerWeatherEmergency" => AlertCategory::WeatherEmergency,
        other => {
            warn!(method = %other, "Unknown bridge method");
            return error_response(
                StatusCode::NOT_FOUND,
                "NOT_IMPLEMENTED",
                format!("Unknown method: {}", other),
            );
        }
    };

    // Authorization is a dispatch precondition; the engine never re-checks
    // it. A denied call requests authorization (fire-and-forget) so a later
    // invocation may find it granted.
    if !state.authorization.is_authorized() {
        state.authorization.request_authorization();
        return error_response(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            "SMS permission not granted".to_string(),
        );
    }

    let payload = request.into_payload(category);

    match state.dispatcher.dispatch(category, &payload).await {
        Ok(result) if result.overall_success => {
            let message = format!(
                "Emergency alert sent to {} of {} recipients",
                result.sent_count,
                result.attempted()
            );
            (
                StatusCode::OK,
                Json(DispatchResponse {
                    sent: result.sent_count,
                    failed: result.failed_count,
                    message,
                }),
            )
                .into_response()
        }
        Ok(result) => error_response(
            StatusCode::BAD_GATEWAY,
            "ALL_DELIVERIES_FAILED",
            format!(
                "Failed to deliver emergency alert to any of {} recipients",
                result.attempted()
            ),
        ),
        Err(DispatchError::UnknownCategory(category)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONFIGURATION_ERROR",
            format!("No dispatch plan configured for category {}", category),
        ),
        Err(DispatchError::PermissionDenied) => error_response(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            "SMS permission not granted".to_string(),
        ),
    }
}

/// Basic health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = SimpleHealthResponse)
    )
)]
async fn health_handler() -> Json<SimpleHealthResponse> {
    Json(SimpleHealthResponse {
        status: "UP".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Liveness probe", body = ProbeResponse)
    )
)]
async fn liveness_probe() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: "LIVE".to_string(),
    })
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Readiness probe", body = ProbeResponse)
    )
)]
async fn readiness_probe() -> Json<ProbeResponse> {
    Json(ProbeResponse {
        status: "READY".to_string(),
    })
}

/// Prometheus metrics endpoint
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "monitoring",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain")
    )
)]
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let output = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        output,
    )
        .into_response()
}
