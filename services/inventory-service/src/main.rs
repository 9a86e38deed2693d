mod app;
mod catalog;
mod handlers;
mod models;
mod state;

use std::{
    sync::{atomic::AtomicU64, Arc},
    time::Duration,
};

use fleet_common::{
    bind_listener, container_id, env_or, init_tracing, redis_url_from_env, shutdown_signal,
};

use crate::catalog::Catalog;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    let _guards = init_tracing("inventory-service");

    let port = env_or("PORT", 8000u16);
    let database_endpoint =
        std::env::var("DATABASE_ENDPOINT").unwrap_or_else(|_| "postgres:5432".to_string());
    let replicas = std::env::var("REPLICAS").unwrap_or_else(|_| "2".to_string());
    let connect_timeout = Duration::from_secs(env_or("UPSTREAM_CONNECT_TIMEOUT_SECS", 5u64));

    let redis_connected = check_redis(&redis_url_from_env(), connect_timeout).await;

    let state = AppState {
        catalog: Catalog::seeded(),
        requests_served: Arc::new(AtomicU64::new(0)),
        redis_connected,
        database_endpoint,
        replicas,
        container_id: container_id(),
    };

    let app = app::build_router(state);
    let listener = bind_listener(port).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");
}

/// One-shot PING at startup; the result is reported by `/health`.
async fn check_redis(redis_url: &str, connect_timeout: Duration) -> bool {
    let client = match redis::Client::open(redis_url) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "invalid redis url");
            return false;
        }
    };

    match tokio::time::timeout(connect_timeout, ping(&client)).await {
        Ok(Ok(_)) => {
            tracing::info!("redis connected");
            true
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "redis ping failed");
            false
        }
        Err(_) => {
            tracing::warn!("redis ping timed out");
            false
        }
    }
}

async fn ping(client: &redis::Client) -> redis::RedisResult<String> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    redis::cmd("PING").query_async(&mut conn).await
}
