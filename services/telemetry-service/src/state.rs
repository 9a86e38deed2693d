use std::sync::Arc;

use crate::store::TelemetryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TelemetryStore>,
    pub container_id: String,
}

impl AppState {
    pub fn new(container_id: String) -> Self {
        Self {
            store: Arc::new(TelemetryStore::new()),
            container_id,
        }
    }
}
