//! Inventory domain module.
//!
//! This crate contains the inventory record, its wire contract and the
//! query filters the repository understands (no IO, no HTTP, no storage).

pub mod filter;
pub mod item;

pub use filter::InventoryFilter;
pub use item::{InventoryItem, InventoryItemId, SupplierStatus, MAX_NAME_LEN};
