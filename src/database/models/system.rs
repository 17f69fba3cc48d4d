use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemSettings {
    pub is_global_paused: bool,
    pub pause_reason: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            is_global_paused: false,
            pause_reason: None,
            updated_by: None,
            updated_at: Utc::now(),
        }
    }
}
