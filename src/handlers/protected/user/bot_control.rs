// handlers/protected/user/bot_control.rs - PIN-gated self pause/resume
//
// POST /api/user/pause-bot   {pin}
// POST /api/user/resume-bot  {pin}

use axum::{extract::State, Extension};
use chrono::Utc;

use crate::api::extract::Json;
use crate::api::format::UserDashboardView;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::user_service::PinRequest;
use crate::services::UserService;
use crate::state::AppState;

pub async fn pause_bot_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PinRequest>,
) -> ApiResult<UserDashboardView> {
    let user = UserService::new(&state).self_pause(&user, payload).await?;
    Ok(ApiResponse::success(UserDashboardView::new(&user, Utc::now())))
}

/// POST /api/user/resume-bot - 403 when blocked or when an admin did the pausing
pub async fn resume_bot_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PinRequest>,
) -> ApiResult<UserDashboardView> {
    let user = UserService::new(&state).self_resume(&user, payload).await?;
    Ok(ApiResponse::success(UserDashboardView::new(&user, Utc::now())))
}
