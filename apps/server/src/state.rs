//! Shared application state

use std::sync::Arc;

use crate::{
    config::{Config, StorageBackend},
    db::{ClinicStore, MemoryStore, PostgresStore},
    services::{DoctorService, PatientService},
    Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ClinicStore>,
    pub doctors: DoctorService,
    pub patients: PatientService,
}

impl AppState {
    /// Build the state for the configured storage backend.
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn ClinicStore> = match config.database.backend {
            StorageBackend::Postgres => Arc::new(PostgresStore::connect(&config.database).await?),
            StorageBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn ClinicStore>) -> Self {
        let max_page_size = config.pagination.max_page_size;

        Self {
            config: Arc::new(config),
            doctors: DoctorService::new(Arc::clone(&store), max_page_size),
            patients: PatientService::new(Arc::clone(&store), max_page_size),
            store,
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }
}
