//! Inventory record storage boundary.
//!
//! The endpoint layer only sees [`InventoryRepository`]; which backend sits
//! behind it (in-memory for dev/test, Postgres for deployments) is decided at
//! startup.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryRepository;
pub use postgres::PostgresInventoryRepository;
pub use r#trait::{InventoryRepository, RepositoryError};
