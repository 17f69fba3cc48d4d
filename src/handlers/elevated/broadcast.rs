// handlers/elevated/broadcast.rs - POST /api/admin/send-update handler

use axum::{extract::State, Extension};

use crate::api::extract::Json;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::notification_service::{BroadcastRequest, BroadcastResult};
use crate::services::NotificationService;
use crate::state::AppState;

/// POST /api/admin/send-update - Notify all customers, one category, or a hand-picked list
///
/// Expected Input:
/// ```json
/// {
///   "subject": "string",
///   "message": "string",
///   "recipient_type": "all",       // all | category | individual
///   "category": "sales",           // Required for recipient_type=category
///   "recipient_ids": ["uuid"],     // Required for recipient_type=individual
///   "send_notification": true,
///   "send_email": true
/// }
/// ```
pub async fn send_update_post(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Json(payload): Json<BroadcastRequest>,
) -> ApiResult<BroadcastResult> {
    let result = NotificationService::new(&state).broadcast(&admin, payload).await?;
    Ok(ApiResponse::success(result))
}
