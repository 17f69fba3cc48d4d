use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl NewLead {
    pub fn into_lead(self, user_id: Uuid) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            user_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            company: self.company,
            notes: self.notes,
            status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }
}
