pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};

use crate::models::{InventoryItem, Invoice, Reminder};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Capability-abstracted document store, one implementation chosen at
/// startup (in-memory demo mode or Postgres). List order is insertion /
/// `created_at` ascending; any presentation ordering is the caller's job.
#[async_trait]
pub trait Store: Send + Sync {
    // Payment reminders
    async fn insert_reminder(&self, reminder: &Reminder) -> Result<(), StoreError>;
    async fn get_reminder(&self, id: &str) -> Result<Option<Reminder>, StoreError>;
    /// Full-record replace. `NotFound` if the id is absent.
    async fn put_reminder(&self, reminder: &Reminder) -> Result<(), StoreError>;
    /// Hard delete. `NotFound` if the id is absent.
    async fn delete_reminder(&self, id: &str) -> Result<(), StoreError>;
    async fn list_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>, StoreError>;

    // Inventory
    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError>;
    async fn get_item(&self, id: &str) -> Result<Option<InventoryItem>, StoreError>;
    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError>;
    async fn delete_item(&self, id: &str) -> Result<(), StoreError>;
    async fn list_inventory(&self, owner_id: &str) -> Result<Vec<InventoryItem>, StoreError>;

    // Invoices
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), StoreError>;
    async fn list_invoices(&self, owner_id: &str) -> Result<Vec<Invoice>, StoreError>;
}
