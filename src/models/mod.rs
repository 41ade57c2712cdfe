pub mod dashboard;
pub mod inventory;
pub mod invoice;
pub mod reminder;

pub use dashboard::{
    ActivityEntry, DashboardStats, Insight, InsightPriority, InsightType, LowStockItem,
    LowStockSummary, PendingPayments, SalesWindow, TotalInventory,
};
pub use inventory::InventoryItem;
pub use invoice::{Invoice, InvoiceStatus};
pub use reminder::{Reminder, ReminderStats, ReminderStatus};
