// handlers/elevated/call_logs.rs - Call history across all customers
//
// GET  /api/admin/call-logs?limit=
// POST /api/admin/call-logs

use axum::extract::State;

use crate::api::extract::{Json, Query};
use crate::api::format::AdminCallLogView;
use crate::handlers::ListQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::call_log_service::RecordCallRequest;
use crate::services::CallLogService;
use crate::state::AppState;

/// GET /api/admin/call-logs - Newest first, with revenue and the caller's name
pub async fn list_get(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<AdminCallLogView>> {
    let limit = state.config.page_size(query.limit);
    let logs = CallLogService::new(&state).all(limit).await?;
    Ok(ApiResponse::success(logs))
}

/// POST /api/admin/call-logs - Record a finished call
///
/// Expected Input:
/// ```json
/// {
///   "user_id": "uuid",
///   "lead_id": "uuid",              // Optional, must belong to user_id
///   "lead_name": "string",
///   "lead_phone": "string",
///   "call_outcome": "interested",   // interested | not_interested | callback | voicemail | no_answer
///   "duration_minutes": 5,
///   "revenue_generated": 120.50,
///   "transcript": "string",         // Optional
///   "recording_url": "string",      // Optional
///   "sip_call_id": "string",        // Optional
///   "caller_id": "string"           // Optional
/// }
/// ```
///
/// Minutes and revenue are added to the user's totals in the same write.
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<RecordCallRequest>,
) -> ApiResult<AdminCallLogView> {
    let log = CallLogService::new(&state).record(payload).await?;
    Ok(ApiResponse::created(log))
}
