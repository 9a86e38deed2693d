use serde::Serialize;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub container: String,
    pub replicas: String,
}

#[derive(Serialize)]
pub struct DependencyStatus {
    pub api: &'static str,
    pub database: String,
    pub redis: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub services: DependencyStatus,
    pub container_id: String,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub requests_served: u64,
    pub uptime: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}
