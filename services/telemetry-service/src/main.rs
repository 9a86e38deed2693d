mod app;
mod handlers;
mod models;
mod state;
mod store;

use fleet_common::{bind_listener, container_id, env_or, init_tracing, shutdown_signal};

use crate::state::AppState;

#[tokio::main]
async fn main() {
    let _guards = init_tracing("telemetry-service");

    let port = env_or("PORT", 8001u16);
    let state = AppState::new(container_id());

    let app = app::build_router(state);
    let listener = bind_listener(port).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");
}
