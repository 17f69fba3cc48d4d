//! Role-aware wire views over store records.
//!
//! Revenue is an admin-only figure: the user-facing views below omit it
//! entirely rather than zeroing it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{CallLog, CallLogWithUser, User};
use crate::services::billing_service::days_until;
use crate::types::{CallOutcome, PaymentStatus, UserCategory, UserRole, UserStatus};

/// Full account view for admins, including revenue and billing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub category: UserCategory,
    pub status: UserStatus,
    pub pause_reason: Option<String>,
    pub paused_by_admin: bool,
    pub function: Option<String>,
    pub sip_endpoint: Option<String>,
    pub prompt: Option<String>,
    pub minutes_used: i32,
    pub minutes_allocated: i32,
    pub revenue_generated: Decimal,
    pub credits_balance: Decimal,
    pub monthly_plan_cost: Decimal,
    pub next_billing_date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub days_until_billing: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl AdminUserView {
    pub fn new(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            category: user.category,
            status: user.status,
            pause_reason: user.pause_reason.clone(),
            paused_by_admin: user.paused_by_admin,
            function: user.function.clone(),
            sip_endpoint: user.sip_endpoint.clone(),
            prompt: user.prompt.clone(),
            minutes_used: user.minutes_used,
            minutes_allocated: user.minutes_allocated,
            revenue_generated: user.revenue_generated,
            credits_balance: user.credits_balance,
            monthly_plan_cost: user.monthly_plan_cost,
            next_billing_date: user.next_billing_date,
            payment_status: user.payment_status,
            days_until_billing: days_until(user.next_billing_date, now),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Dashboard view for regular users. Carries no revenue field.
#[derive(Debug, Clone, Serialize)]
pub struct UserDashboardView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub category: UserCategory,
    pub status: UserStatus,
    pub pause_reason: Option<String>,
    pub paused_by_admin: bool,
    pub minutes_used: i32,
    pub minutes_allocated: i32,
    pub credits_balance: Decimal,
    pub monthly_plan_cost: Decimal,
    pub next_billing_date: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub days_until_billing: i64,
}

impl UserDashboardView {
    pub fn new(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            category: user.category,
            status: user.status,
            pause_reason: user.pause_reason.clone(),
            paused_by_admin: user.paused_by_admin,
            minutes_used: user.minutes_used,
            minutes_allocated: user.minutes_allocated,
            credits_balance: user.credits_balance,
            monthly_plan_cost: user.monthly_plan_cost,
            next_billing_date: user.next_billing_date,
            payment_status: user.payment_status,
            days_until_billing: days_until(user.next_billing_date, now),
        }
    }
}

/// The caller's own profile, shaped by their role.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProfileView {
    Admin(AdminUserView),
    User(UserDashboardView),
}

impl ProfileView {
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        if user.role.is_admin() {
            ProfileView::Admin(AdminUserView::new(user, now))
        } else {
            ProfileView::User(UserDashboardView::new(user, now))
        }
    }
}

/// Call log as its owner sees it: no revenue and no user id.
#[derive(Debug, Clone, Serialize)]
pub struct UserCallLogView {
    pub id: Uuid,
    pub lead_id: Option<Uuid>,
    pub lead_name: String,
    pub lead_phone: String,
    pub call_outcome: CallOutcome,
    pub duration_minutes: i32,
    pub transcript: Option<String>,
    pub recording_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&CallLog> for UserCallLogView {
    fn from(log: &CallLog) -> Self {
        Self {
            id: log.id,
            lead_id: log.lead_id,
            lead_name: log.lead_name.clone(),
            lead_phone: log.lead_phone.clone(),
            call_outcome: log.call_outcome,
            duration_minutes: log.duration_minutes,
            transcript: log.transcript.clone(),
            recording_url: log.recording_url.clone(),
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminCallLogView {
    #[serde(flatten)]
    pub call: UserCallLogView,
    pub user_id: Uuid,
    pub user_name: String,
    pub revenue_generated: Decimal,
    pub sip_call_id: Option<String>,
    pub caller_id: Option<String>,
}

impl AdminCallLogView {
    pub fn new(log: &CallLog, user_name: Option<&str>) -> Self {
        Self {
            call: UserCallLogView::from(log),
            user_id: log.user_id,
            user_name: user_name.unwrap_or("Unknown").to_string(),
            revenue_generated: log.revenue_generated,
            sip_call_id: log.sip_call_id.clone(),
            caller_id: log.caller_id.clone(),
        }
    }
}

impl From<&CallLogWithUser> for AdminCallLogView {
    fn from(row: &CallLogWithUser) -> Self {
        Self::new(&row.log, row.user_name.as_deref())
    }
}
