use super::{AppState, DataResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{DashboardStats, Insight};
use axum::{extract::State, Extension, Json};

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DataResponse<DashboardStats>>, ApiError> {
    let stats = state.dashboard.stats(&user.uid).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/dashboard/insights
pub async fn insights(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DataResponse<Vec<Insight>>>, ApiError> {
    let insights = state.dashboard.insights(&user.uid).await?;
    Ok(Json(DataResponse::new(insights)))
}
