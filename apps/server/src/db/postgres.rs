//! PostgreSQL storage backend

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use super::{
    traits::{ClinicStore, UnitOfWork},
    transaction::PostgresUnitOfWork,
};
use crate::{config::DatabaseConfig, Error, Result};

/// [`ClinicStore`] over a sqlx connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the pool and, when configured, apply the embedded migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min_size)
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(Error::Database)?;

        tracing::info!(
            min_connections = config.pool_min_size,
            max_connections = config.pool_max_size,
            "Database pool ready"
        );

        if config.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| Error::Database(e.into()))?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClinicStore for PostgresStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(Error::Database)?;
        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }
}
