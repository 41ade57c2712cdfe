use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invoice settlement status. Wire values are capitalized ("Paid"/"Pending"),
/// matching the billing frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(InvoiceStatus::Paid),
            "Pending" => Ok(InvoiceStatus::Pending),
            _ => Err(()),
        }
    }
}

/// Issued invoice with GST breakup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub owner_id: String,
    pub invoice_number: String,
    pub customer_name: String,
    pub amount: BigDecimal,
    pub gst: BigDecimal,
    pub total_amount: BigDecimal,
    pub status: InvoiceStatus,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
