use super::{Store, StoreError};
use crate::models::{InventoryItem, Invoice, InvoiceStatus, Reminder, ReminderStatus};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use indexmap::IndexMap;
use tokio::sync::RwLock;

/// In-memory store for demo mode and tests. IndexMap keeps insertion order,
/// so listings are deterministic without a sort key in the store itself.
#[derive(Default)]
pub struct MemoryStore {
    reminders: RwLock<IndexMap<String, Reminder>>,
    inventory: RwLock<IndexMap<String, InventoryItem>>,
    invoices: RwLock<IndexMap<String, Invoice>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the demo dataset for the given owner: the sample kirana-shop
    /// inventory, two open reminders and two invoices.
    pub async fn seed_demo(&self, owner_id: &str) {
        let now = Utc::now();

        let items = [
            ("Maggi 2-Minute Noodles", 12, 45, "Food", 10),
            ("Tata Tea Gold", 145, 8, "Beverages", 15),
            ("Amul Milk 1L", 56, 25, "Dairy", 20),
            ("Parle-G Biscuits", 5, 3, "Snacks", 10),
        ];
        let mut inventory = self.inventory.write().await;
        for (idx, (name, price, quantity, category, threshold)) in items.iter().enumerate() {
            let id = format!("demo-item-{}", idx + 1);
            inventory.insert(
                id.clone(),
                InventoryItem {
                    id,
                    owner_id: owner_id.to_string(),
                    name: name.to_string(),
                    price: BigDecimal::from(*price),
                    quantity: *quantity,
                    category: category.to_string(),
                    threshold: *threshold,
                    created_at: now,
                    last_updated: now,
                },
            );
        }

        let reminders = [
            ("Amit Sharma", 2500, "+919876543211", 5),
            ("Priya Kumar", 1200, "+919876543212", 10),
        ];
        let mut open = self.reminders.write().await;
        for (idx, (customer, amount, phone, due_in_days)) in reminders.iter().enumerate() {
            let id = format!("demo-payment-{}", idx + 1);
            open.insert(
                id.clone(),
                Reminder {
                    id,
                    owner_id: owner_id.to_string(),
                    customer_name: customer.to_string(),
                    amount: BigDecimal::from(*amount),
                    due_date: now + Duration::days(*due_in_days),
                    phone: phone.to_string(),
                    status: ReminderStatus::Pending,
                    original_text: String::new(),
                    created_at: now,
                },
            );
        }

        let invoices = [
            ("INV-2024-001", "Rajesh Kumar", 1200, 216, InvoiceStatus::Paid),
            ("INV-2024-002", "Priya Sharma", 850, 153, InvoiceStatus::Pending),
        ];
        let mut billed = self.invoices.write().await;
        for (idx, (number, customer, amount, gst, status)) in invoices.iter().enumerate() {
            let id = format!("demo-invoice-{}", idx + 1);
            billed.insert(
                id.clone(),
                Invoice {
                    id,
                    owner_id: owner_id.to_string(),
                    invoice_number: number.to_string(),
                    customer_name: customer.to_string(),
                    amount: BigDecimal::from(*amount),
                    gst: BigDecimal::from(*gst),
                    total_amount: BigDecimal::from(*amount + *gst),
                    status: *status,
                    date: now,
                    created_at: now,
                },
            );
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.reminders
            .write()
            .await
            .insert(reminder.id.clone(), reminder.clone());
        Ok(())
    }

    async fn get_reminder(&self, id: &str) -> Result<Option<Reminder>, StoreError> {
        Ok(self.reminders.read().await.get(id).cloned())
    }

    async fn put_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let mut reminders = self.reminders.write().await;
        match reminders.get_mut(&reminder.id) {
            Some(slot) => {
                *slot = reminder.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_reminder(&self, id: &str) -> Result<(), StoreError> {
        // shift_remove keeps the insertion order of the survivors
        self.reminders
            .write()
            .await
            .shift_remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>, StoreError> {
        Ok(self
            .reminders
            .read()
            .await
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        self.inventory
            .write()
            .await
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get_item(&self, id: &str) -> Result<Option<InventoryItem>, StoreError> {
        Ok(self.inventory.read().await.get(id).cloned())
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut inventory = self.inventory.write().await;
        match inventory.get_mut(&item.id) {
            Some(slot) => {
                *slot = item.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        self.inventory
            .write()
            .await
            .shift_remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list_inventory(&self, owner_id: &str) -> Result<Vec<InventoryItem>, StoreError> {
        Ok(self
            .inventory
            .read()
            .await
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        self.invoices
            .write()
            .await
            .insert(invoice.id.clone(), invoice.clone());
        Ok(())
    }

    async fn list_invoices(&self, owner_id: &str) -> Result<Vec<Invoice>, StoreError> {
        Ok(self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(id: &str, owner: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            owner_id: owner.to_string(),
            customer_name: "Test Customer".to_string(),
            amount: BigDecimal::from(100),
            due_date: Utc::now(),
            phone: String::new(),
            status: ReminderStatus::Pending,
            original_text: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = MemoryStore::new();
        store.insert_reminder(&reminder("r1", "u1")).await.unwrap();

        let fetched = store.get_reminder("r1").await.unwrap().unwrap();
        assert_eq!(fetched.customer_name, "Test Customer");
        assert!(store.get_reminder("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_and_delete_report_missing_ids() {
        let store = MemoryStore::new();
        let r = reminder("r1", "u1");

        assert!(matches!(
            store.put_reminder(&r).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_reminder("r1").await,
            Err(StoreError::NotFound)
        ));

        store.insert_reminder(&r).await.unwrap();
        let mut updated = r.clone();
        updated.status = ReminderStatus::Paid;
        store.put_reminder(&updated).await.unwrap();
        assert_eq!(
            store.get_reminder("r1").await.unwrap().unwrap().status,
            ReminderStatus::Paid
        );

        store.delete_reminder("r1").await.unwrap();
        assert!(store.get_reminder("r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_is_owner_scoped_and_insertion_ordered() {
        let store = MemoryStore::new();
        store.insert_reminder(&reminder("a", "u1")).await.unwrap();
        store.insert_reminder(&reminder("b", "u2")).await.unwrap();
        store.insert_reminder(&reminder("c", "u1")).await.unwrap();

        let listed = store.list_reminders("u1").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[tokio::test]
    async fn demo_seed_loads_all_three_collections() {
        let store = MemoryStore::new();
        store.seed_demo("demo-user").await;

        assert_eq!(store.list_inventory("demo-user").await.unwrap().len(), 4);
        assert_eq!(store.list_reminders("demo-user").await.unwrap().len(), 2);
        assert_eq!(store.list_invoices("demo-user").await.unwrap().len(), 2);
        assert!(store.list_inventory("someone-else").await.unwrap().is_empty());
    }
}
