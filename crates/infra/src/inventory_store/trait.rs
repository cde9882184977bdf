use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockkeep_core::DomainError;
use stockkeep_inventory::{InventoryFilter, InventoryItem, InventoryItemId};

/// Inventory repository operation error.
///
/// `NotFound` and `Invalid` are caller errors; `Storage` covers everything the
/// backing store itself reports (connection loss, constraint failures, etc.).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("invalid inventory item: {0}")]
    Invalid(String),

    #[error("inventory item has no id; create it before saving")]
    Unpersisted,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Invalid(msg),
            DomainError::NotFound(msg) => Self::NotFound(msg),
        }
    }
}

/// Persistence contract for inventory records.
///
/// ## Identity
///
/// `create()` assigns a fresh id (ids are never reused) and ignores any id the
/// record already carries. Every other operation addresses rows by id.
///
/// ## Semantics
///
/// - `save()` on an id with no row commits nothing and is not an error.
/// - `delete()` is idempotent.
/// - `find()` reports absence as `Ok(None)`; only storage failures are errors.
/// - `find_by()` is exact, case-sensitive equality on one column.
/// - `toggle_supplier_status()` is all-or-nothing: either every matching row
///   flips or none does.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, RepositoryError>;

    /// Persist changes to an existing record (full replace by id).
    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError>;

    /// Remove a record by id.
    async fn delete(&self, id: InventoryItemId) -> Result<(), RepositoryError>;

    async fn find(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError>;

    /// Like `find()`, but absence is a `NotFound` error.
    async fn find_or_not_found(&self, id: InventoryItemId) -> Result<InventoryItem, RepositoryError> {
        self.find(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Inventory item with id '{id}' was not found."))
        })
    }

    /// Every record. Order is not part of the contract.
    async fn all(&self) -> Result<Vec<InventoryItem>, RepositoryError>;

    async fn find_by(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, RepositoryError>;

    /// Flip `supplier_status` on every record of a supplier and return the
    /// updated records. `NotFound` when the supplier has no records.
    async fn toggle_supplier_status(
        &self,
        supplier_id: i32,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;
}

#[async_trait]
impl<S> InventoryRepository for Arc<S>
where
    S: InventoryRepository + ?Sized,
{
    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, RepositoryError> {
        (**self).create(item).await
    }

    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        (**self).save(item).await
    }

    async fn delete(&self, id: InventoryItemId) -> Result<(), RepositoryError> {
        (**self).delete(id).await
    }

    async fn find(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        (**self).find(id).await
    }

    async fn all(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        (**self).all().await
    }

    async fn find_by(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, RepositoryError> {
        (**self).find_by(filter).await
    }

    async fn toggle_supplier_status(
        &self,
        supplier_id: i32,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        (**self).toggle_supplier_status(supplier_id).await
    }
}

pub(crate) fn supplier_not_found(supplier_id: i32) -> RepositoryError {
    RepositoryError::NotFound(format!(
        "Inventory items with supplier id '{supplier_id}' were not found."
    ))
}
