// handlers/elevated/overview.rs - GET /api/admin/overview handler

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::AdminOverview;
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/admin/overview - Revenue, minutes and top-five rankings across customers
pub async fn overview_get(State(state): State<AppState>) -> ApiResult<AdminOverview> {
    let overview = UserService::new(&state).overview().await?;
    Ok(ApiResponse::success(overview))
}
