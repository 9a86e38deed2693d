use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

const LOW_FUEL_THRESHOLD: f64 = 10.0;
const OVERHEAT_THRESHOLD: f64 = 95.0;
const OVERSPEED_THRESHOLD: f64 = 120.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TelemetryError {
    #[error("no telemetry for vehicle {vehicle_id}")]
    NotFound { vehicle_id: i64 },
}

/// Instrument values carried by one telemetry sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub fuel_level: f64,
    pub engine_temp: f64,
}

impl Reading {
    fn low_fuel(&self) -> bool {
        self.fuel_level < LOW_FUEL_THRESHOLD
    }

    fn overheating(&self) -> bool {
        self.engine_temp > OVERHEAT_THRESHOLD
    }

    fn overspeed(&self) -> bool {
        self.speed > OVERSPEED_THRESHOLD
    }

    /// Display status. Later checks override earlier ones, so only the last
    /// violated threshold (fuel, then temperature, then speed) is reported.
    pub fn status(&self) -> VehicleStatus {
        let mut status = VehicleStatus::Normal;
        if self.low_fuel() {
            status = VehicleStatus::LowFuel;
        }
        if self.overheating() {
            status = VehicleStatus::Overheating;
        }
        if self.overspeed() {
            status = VehicleStatus::Overspeed;
        }
        status
    }

    /// Alerting for aggregate metrics: low fuel or overheating. Overspeed is
    /// not an alert even though it wins the display status.
    pub fn is_alert(&self) -> bool {
        self.low_fuel() || self.overheating()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Normal,
    LowFuel,
    Overheating,
    Overspeed,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Normal => "normal",
            VehicleStatus::LowFuel => "low_fuel",
            VehicleStatus::Overheating => "overheating",
            VehicleStatus::Overspeed => "overspeed",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TelemetrySample {
    pub vehicle_id: i64,
    pub reading: Reading,
    pub timestamp: DateTime<Utc>,
}

/// A stored sample together with the status derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleTelemetry {
    pub sample: TelemetrySample,
    pub status: VehicleStatus,
}

impl From<TelemetrySample> for VehicleTelemetry {
    fn from(sample: TelemetrySample) -> Self {
        let status = sample.reading.status();
        Self { sample, status }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FleetMetrics {
    pub total_vehicles_monitored: usize,
    pub alerts_count: usize,
    pub avg_speed: f64,
    pub avg_fuel_level: f64,
}

/// Latest telemetry sample per vehicle. Every submission replaces the
/// previous sample for the same vehicle; nothing is ever removed.
#[derive(Default)]
pub struct TelemetryStore {
    samples: RwLock<HashMap<i64, TelemetrySample>>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit(
        &self,
        vehicle_id: i64,
        reading: Reading,
        timestamp: Option<DateTime<Utc>>,
    ) -> VehicleTelemetry {
        let sample = TelemetrySample {
            vehicle_id,
            reading,
            timestamp: timestamp.unwrap_or_else(Utc::now),
        };

        self.samples.write().await.insert(vehicle_id, sample.clone());
        sample.into()
    }

    pub async fn get(&self, vehicle_id: i64) -> Result<VehicleTelemetry, TelemetryError> {
        self.samples
            .read()
            .await
            .get(&vehicle_id)
            .cloned()
            .map(VehicleTelemetry::from)
            .ok_or(TelemetryError::NotFound { vehicle_id })
    }

    /// Every known vehicle, sorted by id.
    pub async fn all(&self) -> Vec<VehicleTelemetry> {
        let samples = self.samples.read().await;
        let mut entries: Vec<VehicleTelemetry> =
            samples.values().cloned().map(VehicleTelemetry::from).collect();
        entries.sort_by_key(|entry| entry.sample.vehicle_id);
        entries
    }

    pub async fn vehicle_count(&self) -> usize {
        self.samples.read().await.len()
    }

    pub async fn metrics(&self) -> FleetMetrics {
        let samples = self.samples.read().await;
        let total = samples.len();
        if total == 0 {
            return FleetMetrics::default();
        }

        let mut alerts_count = 0;
        let mut speed_sum = 0.0;
        let mut fuel_sum = 0.0;
        for sample in samples.values() {
            if sample.reading.is_alert() {
                alerts_count += 1;
            }
            speed_sum += sample.reading.speed;
            fuel_sum += sample.reading.fuel_level;
        }

        FleetMetrics {
            total_vehicles_monitored: total,
            alerts_count,
            avg_speed: speed_sum / total as f64,
            avg_fuel_level: fuel_sum / total as f64,
        }
    }
}
