use crate::error::ApiError;
use crate::models::{
    ActivityEntry, DashboardStats, Insight, InsightPriority, InsightType, InventoryItem, Invoice,
    InvoiceStatus, LowStockItem, LowStockSummary, PendingPayments, Reminder, ReminderStatus,
    SalesWindow, TotalInventory,
};
use crate::store::{Store, StoreError};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Dashboard aggregation service: join inventory, reminders and invoices
/// into a snapshot plus heuristic insights. The computations are pure; this
/// struct only owns the fan-out to the store.
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, owner_id: &str) -> Result<DashboardStats, ApiError> {
        let (inventory, reminders, invoices) = self
            .fetch_all(owner_id, "Failed to fetch dashboard statistics", "Unable to retrieve dashboard data", "DASHBOARD_STATS_FETCH_FAILED")
            .await?;
        Ok(compute_stats(&inventory, &reminders, &invoices, Utc::now()))
    }

    pub async fn insights(&self, owner_id: &str) -> Result<Vec<Insight>, ApiError> {
        let (inventory, reminders, invoices) = self
            .fetch_all(owner_id, "Failed to fetch dashboard insights", "Unable to retrieve business insights", "DASHBOARD_INSIGHTS_FETCH_FAILED")
            .await?;
        Ok(insights(&inventory, &reminders, &invoices).collect())
    }

    /// Concurrent three-way fetch; any failure fails the whole request.
    async fn fetch_all(
        &self,
        owner_id: &str,
        error: &'static str,
        message: &'static str,
        code: &'static str,
    ) -> Result<(Vec<InventoryItem>, Vec<Reminder>, Vec<Invoice>), ApiError> {
        futures::try_join!(
            self.store.list_inventory(owner_id),
            self.store.list_reminders(owner_id),
            self.store.list_invoices(owner_id),
        )
        .map_err(|e: StoreError| {
            tracing::error!("{}: {}", error, e);
            ApiError::upstream(error, message, code)
        })
    }
}

fn rupees(amount: &BigDecimal) -> String {
    format!("₹{}", amount)
}

fn paid_totals(invoices: &[&Invoice]) -> (BigDecimal, usize) {
    let paid: Vec<&&Invoice> = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Paid)
        .collect();
    let total = paid
        .iter()
        .fold(BigDecimal::zero(), |acc, i| acc + &i.total_amount);
    (total, paid.len())
}

/// Point-in-time dashboard snapshot. Pure over its inputs.
pub fn compute_stats(
    inventory: &[InventoryItem],
    reminders: &[Reminder],
    invoices: &[Invoice],
    now: DateTime<Utc>,
) -> DashboardStats {
    let today = now.date_naive();
    let week_ago = now - Duration::days(7);

    let today_invoices: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.date.date_naive() == today)
        .collect();
    let week_invoices: Vec<&Invoice> = invoices.iter().filter(|i| i.date >= week_ago).collect();

    let (today_sales, today_txns) = paid_totals(&today_invoices);
    let (week_sales, week_txns) = paid_totals(&week_invoices);

    let open_reminders: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| matches!(r.status, ReminderStatus::Pending | ReminderStatus::Overdue))
        .collect();
    let open_amount = open_reminders
        .iter()
        .fold(BigDecimal::zero(), |acc, r| acc + &r.amount);

    let low_stock: Vec<&InventoryItem> = inventory.iter().filter(|i| i.is_low_stock()).collect();

    let inventory_value = inventory.iter().fold(BigDecimal::zero(), |acc, i| {
        acc + &i.price * BigDecimal::from(i.quantity)
    });

    // Fixed-shape activity feed: three of today's invoices, then two open
    // reminders, capped at five. Input order within each group is kept.
    let recent_activity: Vec<ActivityEntry> = today_invoices
        .iter()
        .take(3)
        .map(|i| ActivityEntry {
            kind: "sale",
            customer: i.customer_name.clone(),
            amount: rupees(&i.total_amount),
            time: "Today",
        })
        .chain(open_reminders.iter().take(2).map(|r| ActivityEntry {
            kind: "reminder",
            customer: r.customer_name.clone(),
            amount: rupees(&r.amount),
            time: "Recent",
        }))
        .take(5)
        .collect();

    DashboardStats {
        today_sales: SalesWindow {
            value: today_sales,
            transactions: today_txns,
            change: "+12%".to_string(),
        },
        this_week_sales: SalesWindow {
            value: week_sales,
            transactions: week_txns,
            change: "+8%".to_string(),
        },
        pending_payments: PendingPayments {
            count: open_reminders.len(),
            change: format!("{} customers", open_reminders.len()),
            value: open_amount,
        },
        low_stock_items: LowStockSummary {
            count: low_stock.len(),
            items: low_stock
                .iter()
                .take(5)
                .map(|i| LowStockItem {
                    name: i.name.clone(),
                    quantity: i.quantity,
                    threshold: i.threshold,
                })
                .collect(),
        },
        total_inventory: TotalInventory {
            count: inventory.len(),
            value: inventory_value,
        },
        recent_activity,
    }
}

/// Heuristic insight rules, evaluated lazily in fixed order. Each call
/// returns a fresh, restartable pass; zero to four records can appear.
pub fn insights<'a>(
    inventory: &'a [InventoryItem],
    reminders: &'a [Reminder],
    invoices: &'a [Invoice],
) -> impl Iterator<Item = Insight> + 'a {
    (0u8..4).filter_map(move |rule| match rule {
        0 => stock_alert(inventory),
        1 => overdue_notice(reminders),
        2 => sales_performance(invoices),
        _ => top_products(inventory),
    })
}

fn stock_alert(inventory: &[InventoryItem]) -> Option<Insight> {
    let low: Vec<&InventoryItem> = inventory.iter().filter(|i| i.is_low_stock()).collect();
    if low.is_empty() {
        return None;
    }
    Some(Insight {
        kind: InsightType::Warning,
        title: "Stock Alert",
        message: format!(
            "{} products are running low and need restocking",
            low.len()
        ),
        priority: InsightPriority::High,
        items: Some(low.iter().take(3).map(|i| i.name.clone()).collect()),
        amount: None,
        trend: None,
    })
}

fn overdue_notice(reminders: &[Reminder]) -> Option<Insight> {
    let overdue: Vec<&Reminder> = reminders
        .iter()
        .filter(|r| r.status == ReminderStatus::Overdue)
        .collect();
    if overdue.is_empty() {
        return None;
    }
    let total = overdue
        .iter()
        .fold(BigDecimal::zero(), |acc, r| acc + &r.amount);
    Some(Insight {
        kind: InsightType::Info,
        title: "Payment Reminder",
        message: format!(
            "{} customers have overdue payments totaling {}",
            overdue.len(),
            rupees(&total)
        ),
        priority: InsightPriority::Medium,
        items: None,
        amount: Some(total),
        trend: None,
    })
}

fn sales_performance(invoices: &[Invoice]) -> Option<Insight> {
    let mut paid: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Paid)
        .collect();
    paid.sort_by(|a, b| b.date.cmp(&a.date));
    paid.truncate(7);
    if paid.len() < 3 {
        return None;
    }

    // The divisor is the window length (7 days), not the sample count.
    let total = paid
        .iter()
        .fold(BigDecimal::zero(), |acc, i| acc + &i.total_amount);
    let average = total / BigDecimal::from(7);
    Some(Insight {
        kind: InsightType::Success,
        title: "Sales Performance",
        message: format!(
            "Your average daily sales are ₹{:.0}. Keep up the good work!",
            average.to_f64().unwrap_or(0.0)
        ),
        priority: InsightPriority::Low,
        items: None,
        amount: None,
        trend: Some("up"),
    })
}

// Ranked by on-hand quantity; the wording is kept from the product copy
// even though it is a most-stocked ranking, not a sales ranking.
fn top_products(inventory: &[InventoryItem]) -> Option<Insight> {
    if inventory.is_empty() {
        return None;
    }
    let mut ranked: Vec<&InventoryItem> = inventory.iter().collect();
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    let names: Vec<String> = ranked.iter().take(3).map(|i| i.name.clone()).collect();
    Some(Insight {
        kind: InsightType::Info,
        title: "Top Products",
        message: format!("Your best-selling items are: {}", names.join(", ")),
        priority: InsightPriority::Low,
        items: Some(names),
        amount: None,
        trend: None,
    })
}
