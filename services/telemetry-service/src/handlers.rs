use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::models::{
    ErrorResponse, HealthResponse, MetricsResponse, ServiceInfo, TelemetryRequest,
    TelemetryResponse,
};
use crate::state::AppState;
use crate::store::TelemetryError;

fn error_response(status: StatusCode, code: &'static str, message: String) -> Response {
    (status, Json(ErrorResponse { code, message })).into_response()
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Telemetry Service",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        container: state.container_id.clone(),
        description: "Real-time vehicle condition monitoring",
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        vehicles_monitored: state.store.vehicle_count().await,
        container_id: state.container_id.clone(),
    })
}

pub async fn submit_telemetry(
    State(state): State<AppState>,
    payload: Result<Json<TelemetryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected telemetry payload");
            return error_response(rejection.status(), "invalid_payload", rejection.body_text());
        }
    };

    let stored = state
        .store
        .submit(payload.vehicle_id, payload.reading(), payload.timestamp)
        .await;
    tracing::info!(
        vehicle_id = stored.sample.vehicle_id,
        status = stored.status.as_str(),
        "telemetry stored"
    );

    (StatusCode::OK, Json(TelemetryResponse::from(stored))).into_response()
}

pub async fn get_telemetry(
    State(state): State<AppState>,
    vehicle_id: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    let Path(vehicle_id) = match vehicle_id {
        Ok(vehicle_id) => vehicle_id,
        Err(rejection) => {
            return error_response(rejection.status(), "invalid_payload", rejection.body_text());
        }
    };

    match state.store.get(vehicle_id).await {
        Ok(entry) => (StatusCode::OK, Json(TelemetryResponse::from(entry))).into_response(),
        Err(err @ TelemetryError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, "telemetry_not_found", err.to_string())
        }
    }
}

pub async fn get_all_telemetry(State(state): State<AppState>) -> Json<Vec<TelemetryResponse>> {
    let entries = state.store.all().await;
    Json(entries.into_iter().map(TelemetryResponse::from).collect())
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(state.store.metrics().await.into())
}
