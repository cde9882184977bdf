//! Infrastructure layer: repositories and configuration.

pub mod config;
pub mod inventory_store;


pub use config::{ServiceConfig, StoreConfig};
pub use inventory_store::{
    InMemoryInventoryRepository, InventoryRepository, PostgresInventoryRepository, RepositoryError,
};
