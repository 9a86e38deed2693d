use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::store::{FleetMetrics, Reading, VehicleStatus, VehicleTelemetry};

#[derive(Deserialize)]
pub struct TelemetryRequest {
    pub vehicle_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub fuel_level: f64,
    pub engine_temp: f64,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// RFC 3339 with an offset, or an ISO 8601 local time taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .map_err(|err| D::Error::custom(format!("invalid timestamp {raw:?}: {err}")))
}

impl TelemetryRequest {
    pub fn reading(&self) -> Reading {
        Reading {
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            fuel_level: self.fuel_level,
            engine_temp: self.engine_temp,
        }
    }
}

#[derive(Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize)]
pub struct VehicleMetrics {
    pub speed: f64,
    pub fuel_level: f64,
    pub engine_temp: f64,
}

#[derive(Serialize)]
pub struct TelemetryResponse {
    pub vehicle_id: i64,
    pub status: VehicleStatus,
    pub location: Location,
    pub metrics: VehicleMetrics,
    pub last_update: DateTime<Utc>,
}

impl From<VehicleTelemetry> for TelemetryResponse {
    fn from(entry: VehicleTelemetry) -> Self {
        let reading = entry.sample.reading;
        Self {
            vehicle_id: entry.sample.vehicle_id,
            status: entry.status,
            location: Location {
                lat: reading.latitude,
                lon: reading.longitude,
            },
            metrics: VehicleMetrics {
                speed: reading.speed,
                fuel_level: reading.fuel_level,
                engine_temp: reading.engine_temp,
            },
            last_update: entry.sample.timestamp,
        }
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub total_vehicles_monitored: usize,
    pub alerts_count: usize,
    pub avg_speed: f64,
    pub avg_fuel_level: f64,
}

impl From<FleetMetrics> for MetricsResponse {
    fn from(metrics: FleetMetrics) -> Self {
        Self {
            total_vehicles_monitored: metrics.total_vehicles_monitored,
            alerts_count: metrics.alerts_count,
            avg_speed: metrics.avg_speed,
            avg_fuel_level: metrics.avg_fuel_level,
        }
    }
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub container: String,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub vehicles_monitored: usize,
    pub container_id: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}
