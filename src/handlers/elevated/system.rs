// handlers/elevated/system.rs - Global pause switch
//
// POST /api/admin/pause-all   {admin_pin, reason?}
// POST /api/admin/resume-all
//
// The global flag blocks non-admin logins and refreshes. Per-user status is
// left as it was, so lifting the flag restores every account's prior state.

use axum::{extract::State, Extension};

use crate::api::extract::Json;
use crate::database::models::SystemSettings;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::user_service::AdminPinRequest;
use crate::services::UserService;
use crate::state::AppState;

pub async fn pause_all_post(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Json(payload): Json<AdminPinRequest>,
) -> ApiResult<SystemSettings> {
    let settings = UserService::new(&state).pause_all(&admin, payload).await?;
    Ok(ApiResponse::success(settings))
}

pub async fn resume_all_post(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
) -> ApiResult<SystemSettings> {
    let settings = UserService::new(&state).resume_all(&admin).await?;
    Ok(ApiResponse::success(settings))
}
