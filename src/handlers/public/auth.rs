// handlers/public/auth.rs - Token acquisition and password recovery (no JWT required)
//
// POST /api/auth/login              {email, password}
// POST /api/auth/refresh            {refresh_token}
// POST /api/auth/forgot-password    {email}
// POST /api/auth/verify-reset-code  {email, code}
// POST /api/auth/reset-password     {email, code, new_password}

use axum::extract::State;
use serde_json::Value;

use crate::api::extract::Json;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{
    ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse, RefreshRequest,
    ResetPasswordRequest, VerifyResetCodeRequest,
};
use crate::services::AuthService;
use crate::state::AppState;

/// POST /api/auth/login - Authenticate and receive an access/refresh token pair
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { "id": "...", "email": "user@lumaa.ai", "role": "user", "status": "active", ... },
///     "access_token": "eyJhbGciOiJIUzI1NiI...",
///     "refresh_token": "eyJhbGciOiJIUzI1NiI...",
///     "token_type": "Bearer",
///     "expires_in": 1800
///   }
/// }
/// ```
///
/// Paused and blocked accounts still log in; their status is in `user` so the
/// client can show the right screen. During a global pause only admins get in.
pub async fn login_post(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let response = AuthService::new(&state).login(payload).await?;
    Ok(ApiResponse::success(response))
}

/// POST /api/auth/refresh - Trade a refresh token for a new token pair
pub async fn refresh_post(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<LoginResponse> {
    let response = AuthService::new(&state).refresh(payload).await?;
    Ok(ApiResponse::success(response))
}

/// POST /api/auth/forgot-password - Issue a reset code if the account exists
pub async fn forgot_password_post(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<ForgotPasswordResponse> {
    let response = AuthService::new(&state).forgot_password(payload).await?;
    Ok(ApiResponse::success(response))
}

pub async fn verify_reset_code_post(
    State(state): State<AppState>,
    Json(payload): Json<VerifyResetCodeRequest>,
) -> ApiResult<Value> {
    AuthService::new(&state).verify_reset_code(payload).await?;
    Ok(ApiResponse::message("Verification code is valid"))
}

pub async fn reset_password_post(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Value> {
    AuthService::new(&state).reset_password(payload).await?;
    Ok(ApiResponse::message("Password has been reset successfully"))
}
