//! Dashboard stats handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::UserService;
use crate::AppState;

#[derive(Serialize)]
pub struct DashboardStatsResponse {
    pub users_count: i64,
}

/// Minimal dashboard stats endpoint
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStatsResponse>> {
    let service = UserService::new(state.db);
    let users_count = service.count().await?;

    Ok(Json(DashboardStatsResponse { users_count }))
}
