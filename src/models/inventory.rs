use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stocked product with a reorder threshold.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i64,
    pub category: String,
    pub threshold: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    /// Low stock: on-hand quantity has fallen to or below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }
}
