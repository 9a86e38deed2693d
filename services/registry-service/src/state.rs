use std::sync::Arc;

use crate::cache::CounterCache;
use crate::metrics::RegistryMetrics;
use crate::repository::VehicleRepository;

#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub cache: Arc<dyn CounterCache>,
    pub metrics: Arc<RegistryMetrics>,
    pub container_id: String,
}
