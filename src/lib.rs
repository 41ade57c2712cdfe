pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::{app, AppState};
pub use config::AppConfig;
pub use error::ApiError;
pub use service::{DashboardService, ReminderService};
pub use store::{create_pool, MemoryStore, PgStore, Store};
