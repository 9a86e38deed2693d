use axum::http::StatusCode;
use chrono::Utc;

use crate::cache::{TOTAL_REQUESTS_KEY, VEHICLES_COUNT_KEY};
use crate::models::{
    ApiMetricsResponse, CreateVehicleRequest, CreateVehicleResponse, DependencyHealth,
    ErrorResponse, HealthResponse, NewVehicle, Vehicle, ACTIVE_STATUS,
};
use crate::repository::RepositoryError;
use crate::state::AppState;

#[derive(Debug)]
pub struct ServiceError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ServiceError {
    pub fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            body: ErrorResponse { code, message },
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate => ServiceError::new(
                StatusCode::CONFLICT,
                "vehicle_exists",
                "a vehicle with this license plate already exists".to_string(),
            ),
            RepositoryError::Unavailable(message) => {
                tracing::error!(error = %message, "database unavailable");
                ServiceError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "database_unavailable",
                    format!("Database unavailable: {message}"),
                )
            }
        }
    }
}

async fn count_request(state: &AppState, method: &str, endpoint: &str) {
    state.metrics.record_request(method, endpoint);
    if let Err(err) = state.cache.incr(TOTAL_REQUESTS_KEY).await {
        tracing::warn!(error = %err, "request counter not mirrored");
    }
}

async fn mirror_vehicle_count(state: &AppState, total: i64) {
    state.metrics.set_vehicles_total(total);
    if let Err(err) = state.cache.set(VEHICLES_COUNT_KEY, total).await {
        tracing::warn!(error = %err, total, "vehicle count not mirrored");
    }
}

pub async fn list_vehicles(state: &AppState) -> Result<Vec<Vehicle>, ServiceError> {
    count_request(state, "GET", "/vehicles").await;

    let vehicles = state.vehicles.list().await?;
    let active = vehicles
        .iter()
        .filter(|vehicle| vehicle.status == ACTIVE_STATUS)
        .count();
    state.metrics.set_vehicles_active(active as i64);
    mirror_vehicle_count(state, vehicles.len() as i64).await;

    Ok(vehicles)
}

fn validate(payload: CreateVehicleRequest) -> Result<NewVehicle, ServiceError> {
    let license_plate = payload.license_plate.trim().to_string();
    if license_plate.is_empty() {
        return Err(ServiceError::new(
            StatusCode::BAD_REQUEST,
            "invalid_vehicle",
            "license_plate is required".to_string(),
        ));
    }
    let model = payload.model.trim().to_string();
    if model.is_empty() {
        return Err(ServiceError::new(
            StatusCode::BAD_REQUEST,
            "invalid_vehicle",
            "model is required".to_string(),
        ));
    }

    Ok(NewVehicle {
        license_plate,
        model,
        year: payload.year,
        fuel_type: payload.fuel_type,
    })
}

pub async fn create_vehicle(
    state: &AppState,
    payload: CreateVehicleRequest,
) -> Result<CreateVehicleResponse, ServiceError> {
    count_request(state, "POST", "/vehicles").await;

    let vehicle = validate(payload)?;
    let created = state.vehicles.insert(vehicle).await?;
    tracing::info!(
        vehicle_id = created.id,
        license_plate = %created.license_plate,
        "vehicle created"
    );

    match state.vehicles.count().await {
        Ok(total) => mirror_vehicle_count(state, total).await,
        Err(err) => tracing::warn!(error = %err, "vehicle count refresh failed"),
    }

    Ok(CreateVehicleResponse {
        message: "Vehicle created",
        id: created.id,
    })
}

pub async fn prometheus_metrics(state: &AppState) -> Result<String, ServiceError> {
    match state.cache.get(VEHICLES_COUNT_KEY).await {
        Ok(count) => state.metrics.set_vehicles_total(count.unwrap_or(0)),
        Err(err) => tracing::warn!(error = %err, "vehicle count not refreshed from cache"),
    }

    state.metrics.render().map_err(|err| {
        tracing::error!(error = %err, "metrics encoding failed");
        ServiceError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "metrics_error",
            "metrics encoding failed".to_string(),
        )
    })
}

pub async fn api_metrics(state: &AppState) -> Result<ApiMetricsResponse, ServiceError> {
    let cache_unavailable = |err: crate::cache::CacheError| {
        tracing::error!(error = %err, "cache unavailable");
        ServiceError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "cache_unavailable",
            err.to_string(),
        )
    };

    let total_requests = state
        .cache
        .get(TOTAL_REQUESTS_KEY)
        .await
        .map_err(cache_unavailable)?;
    let vehicles_count = state
        .cache
        .get(VEHICLES_COUNT_KEY)
        .await
        .map_err(cache_unavailable)?;

    Ok(ApiMetricsResponse {
        total_requests: total_requests.unwrap_or(0),
        vehicles_count: vehicles_count.unwrap_or(0),
        uptime: "running",
    })
}

pub async fn health(state: &AppState) -> HealthResponse {
    let database = match state.vehicles.ping().await {
        Ok(()) => "healthy",
        Err(err) => {
            tracing::warn!(error = %err, "database health check failed");
            "unhealthy"
        }
    };
    let redis = match state.cache.ping().await {
        Ok(()) => "healthy",
        Err(err) => {
            tracing::warn!(error = %err, "redis health check failed");
            "unreachable"
        }
    };

    HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        services: DependencyHealth {
            database,
            redis,
            api: "running",
        },
        container_id: state.container_id.clone(),
    }
}
