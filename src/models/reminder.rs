use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a payment reminder.
///
/// `Paid` is only ever set explicitly and is sticky against date-driven
/// recomputation; `Pending`/`Overdue` are derived from the due date at
/// every mutating write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Overdue,
    Paid,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Overdue => "overdue",
            ReminderStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReminderStatus::Pending),
            "overdue" => Ok(ReminderStatus::Overdue),
            "paid" => Ok(ReminderStatus::Paid),
            _ => Err(()),
        }
    }
}

/// Payment reminder: money owed by a named customer, with a due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub owner_id: String,
    pub customer_name: String,
    pub amount: BigDecimal,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub phone: String,
    pub status: ReminderStatus,
    #[serde(default)]
    pub original_text: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts and sums over a reminder list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStats {
    pub total: usize,
    pub pending: usize,
    pub overdue: usize,
    pub paid: usize,
    pub total_amount: BigDecimal,
    pub pending_amount: BigDecimal,
    pub overdue_amount: BigDecimal,
}
