use crate::error::ApiError;
use crate::models::{Reminder, ReminderStats, ReminderStatus};
use crate::store::{Store, StoreError};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Fields accepted when creating a reminder. Status is never accepted from
/// the caller; it is derived from the due date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminder {
    pub customer_name: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
}

/// Partial update. At least one field must be present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminder {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub amount: Option<BigDecimal>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateReminder {
    fn is_empty(&self) -> bool {
        self.customer_name.is_none()
            && self.amount.is_none()
            && self.due_date.is_none()
            && self.phone.is_none()
            && self.status.is_none()
    }
}

/// Single source of truth for the status invariant: `paid` is sticky,
/// otherwise overdue iff the due date is strictly in the past. Every
/// mutating path routes status through here.
pub fn derive_status(
    due_date: DateTime<Utc>,
    current: ReminderStatus,
    now: DateTime<Utc>,
) -> ReminderStatus {
    if current == ReminderStatus::Paid {
        ReminderStatus::Paid
    } else if due_date < now {
        ReminderStatus::Overdue
    } else {
        ReminderStatus::Pending
    }
}

/// Aggregate counts and sums over a reminder list. Pure; all-zero on empty
/// input.
pub fn compute_stats(reminders: &[Reminder]) -> ReminderStats {
    let mut stats = ReminderStats {
        total: reminders.len(),
        pending: 0,
        overdue: 0,
        paid: 0,
        total_amount: BigDecimal::zero(),
        pending_amount: BigDecimal::zero(),
        overdue_amount: BigDecimal::zero(),
    };

    for reminder in reminders {
        stats.total_amount = &stats.total_amount + &reminder.amount;
        match reminder.status {
            ReminderStatus::Pending => {
                stats.pending += 1;
                stats.pending_amount = &stats.pending_amount + &reminder.amount;
            }
            ReminderStatus::Overdue => {
                stats.overdue += 1;
                stats.overdue_amount = &stats.overdue_amount + &reminder.amount;
            }
            ReminderStatus::Paid => {
                stats.paid += 1;
            }
        }
    }

    stats
}

/// Payment-reminder lifecycle service.
pub struct ReminderService {
    store: Arc<dyn Store>,
}

impl ReminderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: &str, req: CreateReminder) -> Result<Reminder, ApiError> {
        let customer_name = req.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(ApiError::validation(
                "Missing required fields",
                "Customer name and amount are required",
                "MISSING_FIELDS",
            ));
        }
        if req.amount <= BigDecimal::zero() {
            return Err(ApiError::validation(
                "Invalid amount",
                "Amount must be a positive number",
                "INVALID_AMOUNT",
            ));
        }

        let now = Utc::now();
        let due_date = req.due_date.unwrap_or(now);
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            customer_name,
            amount: req.amount,
            due_date,
            phone: req.phone.map(|p| p.trim().to_string()).unwrap_or_default(),
            status: derive_status(due_date, ReminderStatus::Pending, now),
            original_text: req
                .original_text
                .map(|t| t.trim().to_string())
                .unwrap_or_default(),
            created_at: now,
        };

        self.store.insert_reminder(&reminder).await.map_err(|e| {
            backend_error(
                e,
                "Failed to create payment reminder",
                "Unable to create the payment reminder",
                "PAYMENT_REMINDER_CREATE_FAILED",
            )
        })?;

        tracing::info!("Created reminder {} for owner {}", reminder.id, owner_id);
        Ok(reminder)
    }

    pub async fn update(&self, id: &str, req: UpdateReminder) -> Result<Reminder, ApiError> {
        if req.is_empty() {
            return Err(ApiError::validation(
                "No update data provided",
                "At least one field must be provided for update",
                "NO_UPDATE_DATA",
            ));
        }
        if let Some(amount) = &req.amount {
            if *amount <= BigDecimal::zero() {
                return Err(ApiError::validation(
                    "Invalid amount",
                    "Amount must be a positive number",
                    "INVALID_AMOUNT",
                ));
            }
        }
        let requested_status = match req.status.as_deref() {
            Some(raw) => Some(ReminderStatus::from_str(raw).map_err(|_| {
                ApiError::validation(
                    "Invalid status",
                    "Status must be pending, overdue, or paid",
                    "INVALID_STATUS",
                )
            })?),
            None => None,
        };

        let mut reminder = self.fetch(id, "PAYMENT_REMINDER_UPDATE_FAILED").await?;

        if let Some(name) = req.customer_name {
            reminder.customer_name = name.trim().to_string();
        }
        if let Some(amount) = req.amount {
            reminder.amount = amount;
        }
        if let Some(phone) = req.phone {
            reminder.phone = phone.trim().to_string();
        }

        // A supplied due date wins over a supplied status: the status is
        // recomputed from the new date (paid stays sticky). An explicit
        // status alone still passes through derive_status so the stored
        // record never contradicts the date invariant.
        let now = Utc::now();
        let base = if req.due_date.is_some() {
            reminder.status
        } else {
            requested_status.unwrap_or(reminder.status)
        };
        if let Some(due_date) = req.due_date {
            reminder.due_date = due_date;
        }
        reminder.status = derive_status(reminder.due_date, base, now);

        self.store.put_reminder(&reminder).await.map_err(|e| {
            backend_error(
                e,
                "Failed to update payment reminder",
                "Unable to update the payment reminder",
                "PAYMENT_REMINDER_UPDATE_FAILED",
            )
        })?;
        Ok(reminder)
    }

    /// One-way paid transition. Calling it again is a no-op.
    pub async fn mark_paid(&self, id: &str) -> Result<Reminder, ApiError> {
        let mut reminder = self.fetch(id, "MARK_PAID_FAILED").await?;

        if reminder.status != ReminderStatus::Paid {
            reminder.status = ReminderStatus::Paid;
            self.store.put_reminder(&reminder).await.map_err(|e| {
                backend_error(
                    e,
                    "Failed to mark payment as paid",
                    "Unable to update payment status",
                    "MARK_PAID_FAILED",
                )
            })?;
        }
        Ok(reminder)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.store.delete_reminder(id).await.map_err(|e| {
            backend_error(
                e,
                "Failed to delete payment reminder",
                "Unable to delete the payment reminder",
                "PAYMENT_REMINDER_DELETE_FAILED",
            )
        })
    }

    /// All reminders for the owner, newest first. The store does not
    /// guarantee order, so the sort happens here.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Reminder>, ApiError> {
        let mut reminders = self.store.list_reminders(owner_id).await.map_err(|e| {
            backend_error(
                e,
                "Failed to fetch payment reminders",
                "Unable to retrieve payment reminders",
                "PAYMENTS_FETCH_FAILED",
            )
        })?;
        reminders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reminders)
    }

    pub async fn stats(&self, owner_id: &str) -> Result<ReminderStats, ApiError> {
        let reminders = self.store.list_reminders(owner_id).await.map_err(|e| {
            backend_error(
                e,
                "Failed to fetch payment statistics",
                "Unable to retrieve payment statistics",
                "PAYMENT_STATS_FETCH_FAILED",
            )
        })?;
        Ok(compute_stats(&reminders))
    }

    async fn fetch(&self, id: &str, code: &'static str) -> Result<Reminder, ApiError> {
        self.store
            .get_reminder(id)
            .await
            .map_err(|e| {
                backend_error(
                    e,
                    "Failed to load payment reminder",
                    "Unable to load the payment reminder",
                    code,
                )
            })?
            .ok_or_else(reminder_not_found)
    }
}

fn reminder_not_found() -> ApiError {
    ApiError::not_found(
        "Payment reminder not found",
        "The requested payment reminder does not exist",
        "REMINDER_NOT_FOUND",
    )
}

fn backend_error(
    e: StoreError,
    error: &'static str,
    message: &'static str,
    code: &'static str,
) -> ApiError {
    match e {
        StoreError::NotFound => reminder_not_found(),
        StoreError::Backend(detail) => {
            tracing::error!("{}: {}", error, detail);
            ApiError::upstream(error, message, code)
        }
    }
}
