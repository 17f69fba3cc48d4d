use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::models::{
    CategoryBotSettings, CategoryBotSettingsUpdate, User, UserBotSettings, UserBotSettingsUpdate,
};
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{BotModel, UserCategory};

pub const DEFAULT_OPENING_MESSAGE: &str = "Hello! How can I help you today?";
pub const DEFAULT_PROMPT: &str = "You are a helpful AI assistant.";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const MAX_OPENING_MESSAGE_LEN: usize = 500;
pub const MAX_PROMPT_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
    User,
    Category,
    Default,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingSources {
    pub opening_message: SettingSource,
    pub prompt: SettingSource,
    pub model: SettingSource,
    pub temperature: SettingSource,
}

/// Bot configuration as a user's calls will actually see it.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveBotSettings {
    pub category: UserCategory,
    pub opening_message: String,
    pub prompt: String,
    pub model: BotModel,
    pub temperature: f64,
    pub has_user_override: bool,
    pub source: SettingSources,
}

fn pick(user: Option<&String>, category: Option<&String>, fallback: &str) -> (String, SettingSource) {
    if let Some(value) = user {
        (value.clone(), SettingSource::User)
    } else if let Some(value) = category {
        (value.clone(), SettingSource::Category)
    } else {
        (fallback.to_string(), SettingSource::Default)
    }
}

/// Resolve each field independently: user override, then category default, then the built-in default.
/// Model and temperature are never user-overridable.
pub fn resolve(
    category: UserCategory,
    category_settings: Option<&CategoryBotSettings>,
    user_override: Option<&UserBotSettings>,
) -> EffectiveBotSettings {
    let category_settings = category_settings.filter(|s| s.is_active);

    let (opening_message, opening_source) = pick(
        user_override.and_then(|o| o.opening_message.as_ref()),
        category_settings.and_then(|c| c.opening_message.as_ref()),
        DEFAULT_OPENING_MESSAGE,
    );
    let (prompt, prompt_source) = pick(
        user_override.and_then(|o| o.prompt.as_ref()),
        category_settings.and_then(|c| c.prompt.as_ref()),
        DEFAULT_PROMPT,
    );

    let (model, temperature, engine_source) = match category_settings {
        Some(c) => (c.model, c.temperature, SettingSource::Category),
        None => (BotModel::Gpt4, DEFAULT_TEMPERATURE, SettingSource::Default),
    };

    EffectiveBotSettings {
        category,
        opening_message,
        prompt,
        model,
        temperature,
        has_user_override: user_override.is_some(),
        source: SettingSources {
            opening_message: opening_source,
            prompt: prompt_source,
            model: engine_source,
            temperature: engine_source,
        },
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserBotSettingsRequest {
    pub opening_message: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryBotSettingsRequest {
    pub model: Option<BotModel>,
    pub temperature: Option<f64>,
    pub opening_message: Option<String>,
    pub prompt: Option<String>,
}

/// Trim, drop blanks, and enforce a maximum length in characters.
fn checked_text(field: &str, value: Option<String>, max: usize) -> Result<Option<String>, ApiError> {
    let value = match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => return Ok(None),
    };
    if value.chars().count() > max {
        return Err(ApiError::field_error(
            field,
            format!("{} must be at most {} characters", field, max),
        ));
    }
    Ok(Some(value))
}

pub fn parse_category(raw: &str) -> Result<UserCategory, ApiError> {
    raw.parse::<UserCategory>()
        .map_err(|_| ApiError::bad_request(format!("Unknown category '{}'", raw)))
}

pub struct BotSettingsService<'a> {
    state: &'a AppState,
}

impl<'a> BotSettingsService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn effective_for(&self, user: &User) -> Result<EffectiveBotSettings, ApiError> {
        let category = self.state.store.category_settings(user.category).await?;
        let user_override = self.state.store.user_override(user.id).await?;
        Ok(resolve(user.category, category.as_ref(), user_override.as_ref()))
    }

    pub async fn update_user_override(
        &self,
        user: &User,
        request: UserBotSettingsRequest,
    ) -> Result<EffectiveBotSettings, ApiError> {
        let update = UserBotSettingsUpdate {
            opening_message: checked_text("opening_message", request.opening_message, MAX_OPENING_MESSAGE_LEN)?,
            prompt: checked_text("prompt", request.prompt, MAX_PROMPT_LEN)?,
        };
        if update.opening_message.is_some() || update.prompt.is_some() {
            self.state.store.upsert_user_override(user.id, update).await?;
            info!("User {} updated their bot settings", user.email);
        }
        self.effective_for(user).await
    }

    pub async fn reset_user_override(&self, user: &User) -> Result<EffectiveBotSettings, ApiError> {
        if self.state.store.delete_user_override(user.id).await? {
            info!("User {} reset their bot settings to category defaults", user.email);
        }
        self.effective_for(user).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryBotSettings>, ApiError> {
        Ok(self.state.store.list_category_settings().await?)
    }

    pub async fn category(&self, raw: &str) -> Result<CategoryBotSettings, ApiError> {
        let category = parse_category(raw)?;
        self.state
            .store
            .category_settings(category)
            .await?
            .ok_or_else(|| ApiError::not_found("Bot settings not found"))
    }

    pub async fn update_category(
        &self,
        admin: &User,
        raw: &str,
        request: CategoryBotSettingsRequest,
    ) -> Result<CategoryBotSettings, ApiError> {
        let category = parse_category(raw)?;
        if let Some(t) = request.temperature {
            if !(0.0..=2.0).contains(&t) || t.is_nan() {
                return Err(ApiError::field_error(
                    "temperature",
                    "Temperature must be between 0.0 and 2.0",
                ));
            }
        }

        let update = CategoryBotSettingsUpdate {
            model: request.model,
            temperature: request.temperature,
            opening_message: checked_text("opening_message", request.opening_message, MAX_OPENING_MESSAGE_LEN)?,
            prompt: checked_text("prompt", request.prompt, MAX_PROMPT_LEN)?,
        };

        let saved = self
            .state
            .store
            .upsert_category_settings(category, update, Some(admin.id))
            .await?;
        info!("Admin {} updated bot settings for {}", admin.email, category);
        Ok(saved)
    }
}
