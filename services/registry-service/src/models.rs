use serde::{Deserialize, Serialize};

pub const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub license_plate: String,
    pub model: String,
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Validated input for a vehicle insert.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub license_plate: String,
    pub model: String,
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub license_plate: String,
    pub model: String,
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
}

#[derive(Serialize)]
pub struct CreateVehicleResponse {
    pub message: &'static str,
    pub id: i64,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub description: &'static str,
    pub container: String,
}

#[derive(Serialize)]
pub struct DependencyHealth {
    pub database: &'static str,
    pub redis: &'static str,
    pub api: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub services: DependencyHealth,
    pub container_id: String,
}

#[derive(Serialize)]
pub struct ApiMetricsResponse {
    pub total_requests: i64,
    pub vehicles_count: i64,
    pub uptime: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}
