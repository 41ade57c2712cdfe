use super::{Store, StoreError};
use crate::models::{InventoryItem, Invoice, InvoiceStatus, Reminder, ReminderStatus};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Create the database connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut connect_options = PgConnectOptions::from_str(database_url)?;

    // Log statements slower than 5 seconds
    connect_options = connect_options.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        Duration::from_secs(5),
    );

    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}

/// Durable Postgres-backed store.
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ReminderRow {
    id: String,
    owner_id: String,
    customer_name: String,
    amount: BigDecimal,
    due_date: DateTime<Utc>,
    phone: String,
    status: String,
    original_text: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = StoreError;

    fn try_from(row: ReminderRow) -> Result<Self, StoreError> {
        let status = ReminderStatus::from_str(&row.status)
            .map_err(|_| StoreError::Backend(format!("invalid reminder status: {}", row.status)))?;
        Ok(Reminder {
            id: row.id,
            owner_id: row.owner_id,
            customer_name: row.customer_name,
            amount: row.amount,
            due_date: row.due_date,
            phone: row.phone,
            status,
            original_text: row.original_text,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    owner_id: String,
    invoice_number: String,
    customer_name: String,
    amount: BigDecimal,
    gst: BigDecimal,
    total_amount: BigDecimal,
    status: String,
    date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> Result<Self, StoreError> {
        let status = InvoiceStatus::from_str(&row.status)
            .map_err(|_| StoreError::Backend(format!("invalid invoice status: {}", row.status)))?;
        Ok(Invoice {
            id: row.id,
            owner_id: row.owner_id,
            invoice_number: row.invoice_number,
            customer_name: row.customer_name,
            amount: row.amount,
            gst: row.gst,
            total_amount: row.total_amount,
            status,
            date: row.date,
            created_at: row.created_at,
        })
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payment_reminders (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                customer_name TEXT NOT NULL,
                amount NUMERIC NOT NULL,
                due_date TIMESTAMPTZ NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                original_text TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_items (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                price NUMERIC NOT NULL,
                quantity BIGINT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                threshold BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                last_updated TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invoices (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                invoice_number TEXT NOT NULL,
                customer_name TEXT NOT NULL,
                amount NUMERIC NOT NULL,
                gst NUMERIC NOT NULL,
                total_amount NUMERIC NOT NULL,
                status TEXT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_payment_reminders_owner ON payment_reminders (owner_id)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_inventory_items_owner ON inventory_items (owner_id)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_owner ON invoices (owner_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payment_reminders
                (id, owner_id, customer_name, amount, due_date, phone, status, original_text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&reminder.id)
        .bind(&reminder.owner_id)
        .bind(&reminder.customer_name)
        .bind(&reminder.amount)
        .bind(reminder.due_date)
        .bind(&reminder.phone)
        .bind(reminder.status.as_str())
        .bind(&reminder.original_text)
        .bind(reminder.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_reminder(&self, id: &str) -> Result<Option<Reminder>, StoreError> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT id, owner_id, customer_name, amount, due_date, phone, status, original_text, created_at
            FROM payment_reminders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Reminder::try_from).transpose()
    }

    async fn put_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE payment_reminders
            SET customer_name = $2, amount = $3, due_date = $4, phone = $5,
                status = $6, original_text = $7
            WHERE id = $1
            "#,
        )
        .bind(&reminder.id)
        .bind(&reminder.customer_name)
        .bind(&reminder.amount)
        .bind(reminder.due_date)
        .bind(&reminder.phone)
        .bind(reminder.status.as_str())
        .bind(&reminder.original_text)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_reminder(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM payment_reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_reminders(&self, owner_id: &str) -> Result<Vec<Reminder>, StoreError> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT id, owner_id, customer_name, amount, due_date, phone, status, original_text, created_at
            FROM payment_reminders
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Reminder::try_from).collect()
    }

    async fn insert_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items
                (id, owner_id, name, price, quantity, category, threshold, created_at, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.owner_id)
        .bind(&item.name)
        .bind(&item.price)
        .bind(item.quantity)
        .bind(&item.category)
        .bind(item.threshold)
        .bind(item.created_at)
        .bind(item.last_updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_item(&self, id: &str) -> Result<Option<InventoryItem>, StoreError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, owner_id, name, price, quantity, category, threshold, created_at, last_updated
            FROM inventory_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn put_item(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET name = $2, price = $3, quantity = $4, category = $5,
                threshold = $6, last_updated = $7
            WHERE id = $1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.price)
        .bind(item.quantity)
        .bind(&item.category)
        .bind(item.threshold)
        .bind(item.last_updated)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_inventory(&self, owner_id: &str) -> Result<Vec<InventoryItem>, StoreError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, owner_id, name, price, quantity, category, threshold, created_at, last_updated
            FROM inventory_items
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO invoices
                (id, owner_id, invoice_number, customer_name, amount, gst, total_amount, status, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.owner_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_name)
        .bind(&invoice.amount)
        .bind(&invoice.gst)
        .bind(&invoice.total_amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .bind(invoice.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_invoices(&self, owner_id: &str) -> Result<Vec<Invoice>, StoreError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, owner_id, invoice_number, customer_name, amount, gst, total_amount, status, date, created_at
            FROM invoices
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Invoice::try_from).collect()
    }
}
