use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockkeep_core::Entity;
use stockkeep_inventory::{InventoryFilter, InventoryItem, InventoryItemId};

use super::r#trait::{supplier_not_found, InventoryRepository, RepositoryError};

#[derive(Debug)]
struct Rows {
    /// Next id to hand out; ids are never reused, even after deletes.
    next_id: i32,
    items: BTreeMap<InventoryItemId, InventoryItem>,
}

/// In-memory inventory repository.
///
/// Intended for tests/dev. Ids start at 1 in a fresh store.
#[derive(Debug)]
pub struct InMemoryInventoryRepository {
    rows: RwLock<Rows>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Rows {
                next_id: 1,
                items: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Rows>, RepositoryError> {
        self.rows
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Rows>, RepositoryError> {
        self.rows
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))
    }
}

impl Default for InMemoryInventoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, RepositoryError> {
        item.validate()?;

        let mut rows = self.write()?;
        let id = InventoryItemId::new(rows.next_id);
        rows.next_id = rows
            .next_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Storage("inventory id space exhausted".to_string()))?;

        let stored = item.with_id(id);
        rows.items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        let id = item.id().ok_or(RepositoryError::Unpersisted)?;
        item.validate()?;

        let mut rows = self.write()?;
        if let Some(existing) = rows.items.get_mut(&id) {
            *existing = item.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: InventoryItemId) -> Result<(), RepositoryError> {
        self.write()?.items.remove(&id);
        Ok(())
    }

    async fn find(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.read()?.items.values().cloned().collect())
    }

    async fn find_by(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self
            .read()?
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect())
    }

    async fn toggle_supplier_status(
        &self,
        supplier_id: i32,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        // One write lock for the whole batch: no reader observes a half-toggled supplier.
        let mut rows = self.write()?;
        let supplier = InventoryFilter::SupplierId(supplier_id);

        let updated: Vec<InventoryItem> = rows
            .items
            .values_mut()
            .filter(|item| supplier.matches(item))
            .map(|item| {
                item.toggle_supplier_status();
                item.clone()
            })
            .collect();

        if updated.is_empty() {
            return Err(supplier_not_found(supplier_id));
        }
        Ok(updated)
    }
}
