pub mod dashboard;
pub mod reminders;

pub use dashboard::DashboardService;
pub use reminders::ReminderService;
