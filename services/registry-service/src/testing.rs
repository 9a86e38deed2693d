use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::cache::{CacheError, CounterCache};
use crate::metrics::RegistryMetrics;
use crate::models::{NewVehicle, Vehicle, ACTIVE_STATUS};
use crate::repository::{RepositoryError, VehicleRepository};
use crate::state::AppState;

#[derive(Default)]
pub struct MemoryVehicles {
    rows: Mutex<Vec<Vehicle>>,
    pub offline: AtomicBool,
}

impl MemoryVehicles {
    fn check(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    pub fn push_with_status(&self, plate: &str, status: &str) {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(Vehicle {
            id,
            license_plate: plate.to_string(),
            model: "Volvo FH".to_string(),
            year: None,
            fuel_type: None,
            status: status.to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
        });
    }
}

#[async_trait]
impl VehicleRepository for MemoryVehicles {
    async fn list(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert(&self, vehicle: NewVehicle) -> Result<Vehicle, RepositoryError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.license_plate == vehicle.license_plate) {
            return Err(RepositoryError::Duplicate);
        }
        let row = Vehicle {
            id: rows.len() as i64 + 1,
            license_plate: vehicle.license_plate,
            model: vehicle.model,
            year: vehicle.year,
            fuel_type: vehicle.fuel_type,
            status: ACTIVE_STATUS.to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()
    }
}

#[derive(Default)]
pub struct MemoryCache {
    values: Mutex<HashMap<String, i64>>,
    pub offline: AtomicBool,
}

impl MemoryCache {
    fn check(&self) -> Result<(), CacheError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    pub fn value(&self, key: &str) -> Option<i64> {
        self.values.lock().unwrap().get(key).copied()
    }
}

#[async_trait]
impl CounterCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<i64>, CacheError> {
        self.check()?;
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), CacheError> {
        self.check()?;
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        self.check()?;
        let mut values = self.values.lock().unwrap();
        let value = values.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check()
    }
}

pub struct Harness {
    pub state: AppState,
    pub vehicles: Arc<MemoryVehicles>,
    pub cache: Arc<MemoryCache>,
}

pub fn harness() -> Harness {
    let vehicles = Arc::new(MemoryVehicles::default());
    let cache = Arc::new(MemoryCache::default());
    let state = AppState {
        vehicles: vehicles.clone(),
        cache: cache.clone(),
        metrics: Arc::new(RegistryMetrics::new().expect("metrics")),
        container_id: "test-container".to_string(),
    };
    Harness {
        state,
        vehicles,
        cache,
    }
}
