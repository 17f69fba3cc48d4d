// handlers/protected/auth.rs - Authenticated account endpoints
//
// GET  /api/auth/me
// POST /api/auth/verify-pin
// POST /api/auth/change-password
// POST /api/auth/change-pin

use axum::{extract::State, Extension};
use chrono::Utc;
use serde_json::Value;

use crate::api::extract::Json;
use crate::api::format::ProfileView;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::auth_service::{ChangePasswordRequest, ChangePinRequest};
use crate::services::user_service::PinRequest;
use crate::services::AuthService;
use crate::state::AppState;

/// GET /api/auth/me - Current profile
///
/// Admins get the full record including revenue and billing. Users get the
/// dashboard view, which leaves revenue out.
pub async fn me_get(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<ProfileView> {
    Ok(ApiResponse::success(ProfileView::for_user(&user, Utc::now())))
}

/// POST /api/auth/verify-pin - Confirm the caller's PIN before a sensitive action
pub async fn verify_pin_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<PinRequest>,
) -> ApiResult<Value> {
    AuthService::new(&state).verify_pin(&user, &payload.pin).await?;
    Ok(ApiResponse::message("PIN verified"))
}

pub async fn change_password_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Value> {
    AuthService::new(&state).change_password(&user, payload).await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

pub async fn change_pin_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<ChangePinRequest>,
) -> ApiResult<Value> {
    AuthService::new(&state).change_pin(&user, payload).await?;
    Ok(ApiResponse::message("PIN changed successfully"))
}
