use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    api_metrics, create_vehicle, health, list_vehicles, prometheus_metrics, root,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/metrics", get(prometheus_metrics))
        .route("/api/metrics", get(api_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
