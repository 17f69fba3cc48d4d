// handlers/protected/user/bot_settings.rs - GET|PUT|DELETE /api/user/bot-settings

use axum::{extract::State, Extension};

use crate::api::extract::Json;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::bot_settings_service::{EffectiveBotSettings, UserBotSettingsRequest};
use crate::services::BotSettingsService;
use crate::state::AppState;

/// GET /api/user/bot-settings - Effective settings after the user → category → default fallback
pub async fn bot_settings_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<EffectiveBotSettings> {
    let settings = BotSettingsService::new(&state).effective_for(&user).await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/user/bot-settings - Partial override of the opening message and prompt
///
/// Expected Input:
/// ```json
/// {
///   "opening_message": "string",  // Optional, at most 500 characters
///   "prompt": "string"            // Optional, at most 2000 characters
/// }
/// ```
pub async fn bot_settings_put(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UserBotSettingsRequest>,
) -> ApiResult<EffectiveBotSettings> {
    let settings = BotSettingsService::new(&state)
        .update_user_override(&user, payload)
        .await?;
    Ok(ApiResponse::success(settings))
}

/// DELETE /api/user/bot-settings - Drop the override and fall back to category defaults
pub async fn bot_settings_delete(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<EffectiveBotSettings> {
    let settings = BotSettingsService::new(&state).reset_user_override(&user).await?;
    Ok(ApiResponse::success(settings))
}
