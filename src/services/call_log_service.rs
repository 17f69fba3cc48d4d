use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::format::{AdminCallLogView, UserCallLogView};
use crate::database::models::{NewCallLog, User};
use crate::database::store::REVENUE_DIGITS;
use crate::error::ApiError;
use crate::services::billing_service::check_money;
use crate::state::AppState;
use crate::types::CallOutcome;

/// A single call never runs longer than a day.
pub const MAX_CALL_MINUTES: i32 = 24 * 60;

#[derive(Debug, Deserialize)]
pub struct RecordCallRequest {
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    pub lead_name: String,
    pub lead_phone: String,
    pub call_outcome: CallOutcome,
    #[serde(default)]
    pub duration_minutes: i32,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    #[serde(default)]
    pub revenue_generated: Decimal,
    pub sip_call_id: Option<String>,
    pub caller_id: Option<String>,
}

pub struct CallLogService<'a> {
    state: &'a AppState,
}

impl<'a> CallLogService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn for_user(&self, user: &User, limit: i64) -> Result<Vec<UserCallLogView>, ApiError> {
        let logs = self.state.store.list_call_logs(user.id, limit).await?;
        Ok(logs.iter().map(UserCallLogView::from).collect())
    }

    pub async fn all(&self, limit: i64) -> Result<Vec<AdminCallLogView>, ApiError> {
        let logs = self.state.store.list_call_logs_with_users(limit).await?;
        Ok(logs.iter().map(AdminCallLogView::from).collect())
    }

    /// Store a call and roll its minutes and revenue into the user's totals.
    pub async fn record(&self, request: RecordCallRequest) -> Result<AdminCallLogView, ApiError> {
        if request.duration_minutes < 0 {
            return Err(ApiError::field_error("duration_minutes", "Duration cannot be negative"));
        }
        if request.duration_minutes > MAX_CALL_MINUTES {
            return Err(ApiError::field_error(
                "duration_minutes",
                format!("Duration cannot exceed {} minutes", MAX_CALL_MINUTES),
            ));
        }
        if request.revenue_generated < Decimal::ZERO {
            return Err(ApiError::field_error("revenue_generated", "Revenue cannot be negative"));
        }
        check_money("revenue_generated", request.revenue_generated, REVENUE_DIGITS)?;
        let lead_name = request.lead_name.trim().to_string();
        let lead_phone = request.lead_phone.trim().to_string();
        if lead_name.is_empty() || lead_phone.is_empty() {
            return Err(ApiError::validation_error("Missing required fields (lead_name, lead_phone)", None));
        }

        let user = self
            .state
            .store
            .user_by_id(request.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if let Some(lead_id) = request.lead_id {
            let owned = self
                .state
                .store
                .lead_by_id(lead_id)
                .await?
                .is_some_and(|lead| lead.user_id == user.id);
            if !owned {
                return Err(ApiError::bad_request("Lead does not belong to this user"));
            }
        }

        let log = self
            .state
            .store
            .record_call(NewCallLog {
                user_id: user.id,
                lead_id: request.lead_id,
                lead_name,
                lead_phone,
                call_outcome: request.call_outcome,
                duration_minutes: request.duration_minutes,
                transcript: request.transcript,
                recording_url: request.recording_url,
                revenue_generated: request.revenue_generated,
                sip_call_id: request.sip_call_id,
                caller_id: request.caller_id,
            })
            .await?;

        info!(
            "Recorded {} minute call for {} ({})",
            log.duration_minutes, user.email, log.call_outcome
        );
        Ok(AdminCallLogView::new(&log, Some(&user.name)))
    }
}
