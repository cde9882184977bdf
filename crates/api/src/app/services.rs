//! Service wiring: which repository backs the endpoints.

use std::sync::Arc;

use anyhow::Context;

use stockkeep_infra::{
    InMemoryInventoryRepository, InventoryRepository, PostgresInventoryRepository, StoreConfig,
};

/// Name and version reported by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "Inventory REST API Service",
            version: "1.0",
        }
    }
}

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    repository: Arc<dyn InventoryRepository>,
    info: ServiceInfo,
}

impl AppServices {
    pub fn new(repository: Arc<dyn InventoryRepository>) -> Self {
        Self {
            repository,
            info: ServiceInfo::default(),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryInventoryRepository::new()))
    }

    pub fn repository(&self) -> &dyn InventoryRepository {
        self.repository.as_ref()
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }
}

/// Build services for the configured store.
///
/// The Postgres backend connects eagerly and creates the `inventory` table if
/// it is missing.
pub async fn build_services(store: &StoreConfig) -> anyhow::Result<AppServices> {
    match store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory inventory store");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let repo = PostgresInventoryRepository::connect(database_url, *max_connections)
                .await
                .context("failed to connect to Postgres")?;
            repo.ensure_schema()
                .await
                .context("failed to create inventory table")?;
            tracing::info!(max_connections, "using Postgres inventory store");
            Ok(AppServices::new(Arc::new(repo)))
        }
    }
}
