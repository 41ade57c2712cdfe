pub mod dashboard;
pub mod handlers;
pub mod inventory;
pub mod invoices;
pub mod payments;

use crate::auth::{require_auth, TokenVerifier};
use crate::service::{DashboardService, ReminderService};
use crate::store::Store;
use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;

pub use handlers::health;

/// Shared state: storage and auth capabilities chosen at startup, plus the
/// two services built over them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub reminders: Arc<ReminderService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            reminders: Arc::new(ReminderService::new(store.clone())),
            dashboard: Arc::new(DashboardService::new(store.clone())),
            store,
            verifier,
        }
    }
}

/// Build the full application router. Everything under /api requires a
/// bearer token; /health is open.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/payments", get(payments::list).post(payments::create))
        .route("/payments/stats", get(payments::stats))
        .route(
            "/payments/:id",
            put(payments::update).delete(payments::remove),
        )
        .route("/payments/:id/mark-paid", put(payments::mark_paid))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/insights", get(dashboard::insights))
        .route("/inventory", get(inventory::list).post(inventory::create))
        .route(
            "/inventory/:id",
            put(inventory::update).delete(inventory::remove),
        )
        .route("/invoices", get(invoices::list).post(invoices::create))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(ServiceBuilder::new())
        .with_state(state)
}

/// Collection response body.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Mutation response body.
#[derive(Debug, Serialize)]
pub struct MutationResponse<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T> MutationResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

/// Read-only single-payload response body.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
