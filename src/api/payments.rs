use super::{AppState, DataResponse, ListResponse, MutationResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Reminder, ReminderStats, ReminderStatus};
use crate::service::reminders::{CreateReminder, UpdateReminder};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeletedReminder {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MarkPaidData {
    pub id: String,
    pub status: ReminderStatus,
}

/// GET /api/payments, all reminders for the caller, newest first.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ListResponse<Reminder>>, ApiError> {
    let reminders = state.reminders.list(&user.uid).await?;
    Ok(Json(ListResponse::new(reminders)))
}

/// POST /api/payments
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateReminder>,
) -> Result<(StatusCode, Json<MutationResponse<Reminder>>), ApiError> {
    let reminder = state.reminders.create(&user.uid, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new(
            "Payment reminder created successfully",
            reminder,
        )),
    ))
}

/// PUT /api/payments/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReminder>,
) -> Result<Json<MutationResponse<Reminder>>, ApiError> {
    let reminder = state.reminders.update(&id, req).await?;
    Ok(Json(MutationResponse::new(
        "Payment reminder updated successfully",
        reminder,
    )))
}

/// DELETE /api/payments/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse<DeletedReminder>>, ApiError> {
    state.reminders.remove(&id).await?;
    Ok(Json(MutationResponse::new(
        "Payment reminder deleted successfully",
        DeletedReminder { id },
    )))
}

/// PUT /api/payments/:id/mark-paid
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse<MarkPaidData>>, ApiError> {
    let reminder = state.reminders.mark_paid(&id).await?;
    Ok(Json(MutationResponse::new(
        "Payment reminder marked as paid",
        MarkPaidData {
            id: reminder.id,
            status: reminder.status,
        },
    )))
}

/// GET /api/payments/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DataResponse<ReminderStats>>, ApiError> {
    let stats = state.reminders.stats(&user.uid).await?;
    Ok(Json(DataResponse::new(stats)))
}
