use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::catalog::CatalogVehicle;
use crate::models::{
    DependencyStatus, ErrorResponse, HealthResponse, MetricsResponse, ServiceInfo,
};
use crate::state::AppState;

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "ProjectPlatform API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        container: state.container_id.clone(),
        replicas: state.replicas.clone(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        services: DependencyStatus {
            api: "running",
            database: state.database_endpoint.clone(),
            redis: if state.redis_connected {
                "connected"
            } else {
                "disconnected"
            },
        },
        container_id: state.container_id.clone(),
    })
}

pub async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<CatalogVehicle>> {
    state.count_request();
    Json(state.catalog.all().to_vec())
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    vehicle_id: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    state.count_request();
    let Path(vehicle_id) = match vehicle_id {
        Ok(vehicle_id) => vehicle_id,
        Err(rejection) => {
            let body = ErrorResponse {
                code: "invalid_payload",
                message: rejection.body_text(),
            };
            return (rejection.status(), Json(body)).into_response();
        }
    };

    match state.catalog.find(vehicle_id) {
        Some(vehicle) => (StatusCode::OK, Json(vehicle.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                code: "vehicle_not_found",
                message: "Vehicle not found".to_string(),
            }),
        )
            .into_response(),
    }
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_vehicles: state.catalog.all().len(),
        active_vehicles: state.catalog.active_count(),
        requests_served: state.requests_served(),
        uptime: "running",
    })
}
