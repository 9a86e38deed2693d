use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::catalog::Catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub requests_served: Arc<AtomicU64>,
    pub redis_connected: bool,
    pub database_endpoint: String,
    pub replicas: String,
    pub container_id: String,
}

impl AppState {
    pub fn count_request(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}
