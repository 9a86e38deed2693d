use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use std::time::Duration;

pub const VEHICLES_COUNT_KEY: &str = "vehicles:count";
pub const TOTAL_REQUESTS_KEY: &str = "total_requests";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

/// Flat integer counters mirrored into the key-value cache.
#[async_trait]
pub trait CounterCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<i64>, CacheError>;

    async fn set(&self, key: &str, value: i64) -> Result<(), CacheError>;

    async fn incr(&self, key: &str) -> Result<i64, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

pub struct RedisCounterCache {
    client: redis::Client,
    connect_timeout: Duration,
}

impl RedisCounterCache {
    /// Validates the URL only; connections are opened per operation.
    pub fn new(redis_url: &str, connect_timeout: Duration) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            connect_timeout,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| CacheError::Unavailable("connect timed out".to_string()))?
        .map_err(CacheError::from)
    }
}

#[async_trait]
impl CounterCache for RedisCounterCache {
    async fn get(&self, key: &str) -> Result<Option<i64>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<i64> = conn.get(key).await?;
        tracing::debug!(key, ?value, "cache get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        tracing::debug!(key, value, "cache set");
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut conn = self.connection().await?;
        Ok(conn.incr(key, 1i64).await?)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
