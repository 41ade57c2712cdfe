use bigdecimal::BigDecimal;
use serde::Serialize;

/// Sales totals over a time window (today / trailing week).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesWindow {
    pub value: BigDecimal,
    pub transactions: usize,
    pub change: String,
}

/// Outstanding reminder money (pending + overdue).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayments {
    pub value: BigDecimal,
    pub count: usize,
    pub change: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub name: String,
    pub quantity: i64,
    pub threshold: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockSummary {
    pub count: usize,
    pub items: Vec<LowStockItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalInventory {
    pub count: usize,
    pub value: BigDecimal,
}

/// One line of the dashboard activity feed. A fixed-shape merge of today's
/// sales followed by open reminders; amounts are pre-rendered display strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub customer: String,
    pub amount: String,
    pub time: &'static str,
}

/// Point-in-time dashboard snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_sales: SalesWindow,
    pub this_week_sales: SalesWindow,
    pub pending_payments: PendingPayments,
    pub low_stock_items: LowStockSummary,
    pub total_inventory: TotalInventory,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    High,
    Medium,
    Low,
}

/// Rule-derived business observation surfaced on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub title: &'static str,
    pub message: String,
    pub priority: InsightPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<&'static str>,
}
