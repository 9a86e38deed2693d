use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::metrics::CONTENT_TYPE;
use crate::models::{CreateVehicleRequest, ErrorResponse, HealthResponse, ServiceInfo};
use crate::service;
use crate::state::AppState;

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Autopark Management Platform",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        description: "Fleet management vehicle registry",
        container: state.container_id.clone(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(service::health(&state).await)
}

pub async fn list_vehicles(State(state): State<AppState>) -> impl IntoResponse {
    match service::list_vehicles(&state).await {
        Ok(vehicles) => (StatusCode::OK, Json(vehicles)).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected vehicle payload");
            let body = ErrorResponse {
                code: "invalid_payload",
                message: rejection.body_text(),
            };
            return (rejection.status(), Json(body)).into_response();
        }
    };

    match service::create_vehicle(&state, payload).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}

pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match service::prometheus_metrics(&state).await {
        Ok(text) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], text).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}

pub async fn api_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match service::api_metrics(&state).await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(err) => (err.status, Json(err.body)).into_response(),
    }
}
