// handlers/protected/user/call_logs.rs - GET /api/user/call-logs handler

use axum::{extract::State, Extension};

use crate::api::extract::Query;
use crate::api::format::UserCallLogView;
use crate::handlers::ListQuery;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::CallLogService;
use crate::state::AppState;

/// GET /api/user/call-logs?limit= - Own calls, newest first. Revenue is admin-only.
pub async fn call_logs_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<UserCallLogView>> {
    let limit = state.config.page_size(query.limit);
    let logs = CallLogService::new(&state).for_user(&user, limit).await?;
    Ok(ApiResponse::success(logs))
}
