// handlers/elevated/bot_settings.rs - Category-wide bot defaults
//
// GET /api/admin/bot-settings
// GET /api/admin/bot-settings/:category
// PUT /api/admin/bot-settings/:category

use axum::{extract::State, Extension};

use crate::api::extract::{Json, Path};
use crate::database::models::CategoryBotSettings;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::bot_settings_service::CategoryBotSettingsRequest;
use crate::services::BotSettingsService;
use crate::state::AppState;

pub async fn list_get(State(state): State<AppState>) -> ApiResult<Vec<CategoryBotSettings>> {
    let settings = BotSettingsService::new(&state).list_categories().await?;
    Ok(ApiResponse::success(settings))
}

/// GET /api/admin/bot-settings/:category - 400 for an unknown category, 404 if nothing is stored
pub async fn category_get(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<CategoryBotSettings> {
    let settings = BotSettingsService::new(&state).category(&category).await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/admin/bot-settings/:category - Partial upsert
///
/// Expected Input:
/// ```json
/// {
///   "model": "gpt-4",             // Optional: gpt-4 | gpt-3.5-turbo | claude-3
///   "temperature": 0.7,           // Optional: 0.0 - 2.0
///   "opening_message": "string",  // Optional, at most 500 characters
///   "prompt": "string"            // Optional, at most 2000 characters
/// }
/// ```
pub async fn category_put(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(category): Path<String>,
    Json(payload): Json<CategoryBotSettingsRequest>,
) -> ApiResult<CategoryBotSettings> {
    let settings = BotSettingsService::new(&state)
        .update_category(&admin, &category, payload)
        .await?;
    Ok(ApiResponse::success(settings))
}
