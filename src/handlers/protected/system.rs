// handlers/protected/system.rs - GET /api/system/status handler

use axum::{extract::State, Extension};

use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::user_service::SystemStatus;
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/system/status - Global pause flag plus the caller's own bot status
pub async fn status_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<SystemStatus> {
    let status = UserService::new(&state).system_status(&user).await?;
    Ok(ApiResponse::success(status))
}
