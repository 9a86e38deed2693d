use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_postgres::{error::SqlState, Client, NoTls};

use crate::db;
use crate::models::{NewVehicle, Vehicle};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("license plate already registered")]
    Duplicate,
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl From<tokio_postgres::Error> for RepositoryError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            RepositoryError::Duplicate
        } else {
            RepositoryError::Unavailable(err.to_string())
        }
    }
}

/// Relational storage for vehicle records.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Vehicle>, RepositoryError>;

    /// Inserts an active vehicle. A plate that already exists yields
    /// [`RepositoryError::Duplicate`].
    async fn insert(&self, vehicle: NewVehicle) -> Result<Vehicle, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// PostgreSQL-backed repository. Connects on first use and again whenever
/// the previous connection has closed, so an unreachable database surfaces
/// as [`RepositoryError::Unavailable`] instead of stopping the service.
pub struct PgVehicleRepository {
    database_url: String,
    connect_timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl PgVehicleRepository {
    pub fn new(database_url: String, connect_timeout: Duration) -> Self {
        Self {
            database_url,
            connect_timeout,
            client: Mutex::new(None),
        }
    }

    async fn connect(&self) -> Result<Client, RepositoryError> {
        let (client, connection) = tokio::time::timeout(
            self.connect_timeout,
            tokio_postgres::connect(&self.database_url, NoTls),
        )
        .await
        .map_err(|_| RepositoryError::Unavailable("connect timed out".to_string()))??;
        tokio::spawn(async move {
            // Drive the connection in the background.
            if let Err(err) = connection.await {
                tracing::error!(error = %err, "database connection error");
            }
        });

        if let Err(err) = db::ensure_schema(&client).await {
            tracing::warn!(error = %err, "could not create vehicles table");
        }
        tracing::info!("database connected");
        Ok(client)
    }

    async fn connected<'a>(
        &self,
        slot: &'a mut Option<Client>,
    ) -> Result<&'a Client, RepositoryError> {
        if slot.as_ref().map_or(true, Client::is_closed) {
            *slot = Some(self.connect().await?);
        }
        slot.as_ref()
            .ok_or_else(|| RepositoryError::Unavailable("no database connection".to_string()))
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn list(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        let mut slot = self.client.lock().await;
        let db = self.connected(&mut slot).await?;
        Ok(db::list_vehicles(db).await?)
    }

    async fn insert(&self, vehicle: NewVehicle) -> Result<Vehicle, RepositoryError> {
        let mut slot = self.client.lock().await;
        let db = self.connected(&mut slot).await?;
        Ok(db::insert_vehicle(db, &vehicle).await?)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let mut slot = self.client.lock().await;
        let db = self.connected(&mut slot).await?;
        Ok(db::count_vehicles(db).await?)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let mut slot = self.client.lock().await;
        let db = self.connected(&mut slot).await?;
        Ok(db::ping(db).await?)
    }
}
