use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::CallOutcome;

#[derive(Debug, Clone, FromRow)]
pub struct CallLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub lead_name: String,
    pub lead_phone: String,
    #[sqlx(try_from = "String")]
    pub call_outcome: CallOutcome,
    pub duration_minutes: i32,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub revenue_generated: Decimal,
    pub sip_call_id: Option<String>,
    pub caller_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A call log joined with the owning user's display name, for admin listings.
#[derive(Debug, Clone, FromRow)]
pub struct CallLogWithUser {
    #[sqlx(flatten)]
    pub log: CallLog,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCallLog {
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub lead_name: String,
    pub lead_phone: String,
    pub call_outcome: CallOutcome,
    pub duration_minutes: i32,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub revenue_generated: Decimal,
    pub sip_call_id: Option<String>,
    pub caller_id: Option<String>,
}

impl NewCallLog {
    pub fn into_call_log(self) -> CallLog {
        CallLog {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            lead_id: self.lead_id,
            lead_name: self.lead_name,
            lead_phone: self.lead_phone,
            call_outcome: self.call_outcome,
            duration_minutes: self.duration_minutes,
            transcript: self.transcript,
            recording_url: self.recording_url,
            revenue_generated: self.revenue_generated,
            sip_call_id: self.sip_call_id,
            caller_id: self.caller_id,
            created_at: Utc::now(),
        }
    }
}
