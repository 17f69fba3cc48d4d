use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{BotModel, UserCategory};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryBotSettings {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub category: UserCategory,
    #[sqlx(try_from = "String")]
    pub model: BotModel,
    pub temperature: f64,
    pub opening_message: Option<String>,
    pub prompt: Option<String>,
    pub is_active: bool,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Partial category update; `None` keeps the stored (or default) value.
#[derive(Debug, Clone, Default)]
pub struct CategoryBotSettingsUpdate {
    pub model: Option<BotModel>,
    pub temperature: Option<f64>,
    pub opening_message: Option<String>,
    pub prompt: Option<String>,
}

impl CategoryBotSettingsUpdate {
    /// Merge into the existing row, or start a fresh one for `category`.
    pub fn merge(
        &self,
        existing: Option<CategoryBotSettings>,
        category: UserCategory,
        updated_by: Option<Uuid>,
    ) -> CategoryBotSettings {
        let mut settings = existing.unwrap_or_else(|| CategoryBotSettings {
            id: Uuid::new_v4(),
            category,
            model: BotModel::Gpt4,
            temperature: 0.7,
            opening_message: None,
            prompt: None,
            is_active: true,
            updated_by: None,
            updated_at: Utc::now(),
        });

        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(temperature) = self.temperature {
            settings.temperature = temperature;
        }
        if let Some(opening) = &self.opening_message {
            settings.opening_message = Some(opening.clone());
        }
        if let Some(prompt) = &self.prompt {
            settings.prompt = Some(prompt.clone());
        }
        settings.updated_by = updated_by;
        settings.updated_at = Utc::now();
        settings
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserBotSettings {
    pub user_id: Uuid,
    pub opening_message: Option<String>,
    pub prompt: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UserBotSettingsUpdate {
    pub opening_message: Option<String>,
    pub prompt: Option<String>,
}

impl UserBotSettingsUpdate {
    pub fn merge(&self, existing: Option<UserBotSettings>, user_id: Uuid) -> UserBotSettings {
        let mut settings = existing.unwrap_or(UserBotSettings {
            user_id,
            opening_message: None,
            prompt: None,
            updated_at: Utc::now(),
        });
        if let Some(opening) = &self.opening_message {
            settings.opening_message = Some(opening.clone());
        }
        if let Some(prompt) = &self.prompt {
            settings.prompt = Some(prompt.clone());
        }
        settings.updated_at = Utc::now();
        settings
    }
}
