use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{PaymentStatus, UserCategory, UserRole, UserStatus};

/// Account row. Not `Serialize`: responses go through the role-aware views in `api::format`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub pin_hash: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    #[sqlx(try_from = "String")]
    pub category: UserCategory,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub pause_reason: Option<String>,
    pub paused_by_admin: bool,
    pub function: Option<String>,
    pub sip_endpoint: Option<String>,
    pub prompt: Option<String>,
    pub minutes_allocated: i32,
    pub minutes_used: i32,
    pub credits_balance: Decimal,
    pub monthly_plan_cost: Decimal,
    pub next_billing_date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
    pub revenue_generated: Decimal,
    pub is_active: bool,
    pub reset_code_hash: Option<String>,
    pub reset_code_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when an account is created; everything else takes its default.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub pin_hash: Option<String>,
    pub role: UserRole,
    pub category: UserCategory,
    pub function: Option<String>,
    pub sip_endpoint: Option<String>,
    pub prompt: Option<String>,
    pub minutes_allocated: i32,
    pub minutes_used: i32,
    pub credits_balance: Decimal,
    pub monthly_plan_cost: Decimal,
    pub next_billing_date: DateTime<Utc>,
}

impl NewUser {
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email.to_lowercase(),
            password_hash: self.password_hash,
            pin_hash: self.pin_hash,
            role: self.role,
            category: self.category,
            status: UserStatus::Active,
            pause_reason: None,
            paused_by_admin: false,
            function: self.function,
            sip_endpoint: self.sip_endpoint,
            prompt: self.prompt,
            minutes_allocated: self.minutes_allocated,
            minutes_used: self.minutes_used,
            credits_balance: self.credits_balance,
            monthly_plan_cost: self.monthly_plan_cost,
            next_billing_date: self.next_billing_date,
            payment_status: PaymentStatus::Pending,
            revenue_generated: Decimal::ZERO,
            is_active: true,
            reset_code_hash: None,
            reset_code_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<UserCategory>,
    pub minutes_allocated: Option<i32>,
    pub monthly_plan_cost: Option<Decimal>,
    pub status: Option<UserStatus>,
    pub function: Option<String>,
    pub sip_endpoint: Option<String>,
    pub prompt: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.category.is_none()
            && self.minutes_allocated.is_none()
            && self.monthly_plan_cost.is_none()
            && self.status.is_none()
            && self.function.is_none()
            && self.sip_endpoint.is_none()
            && self.prompt.is_none()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.to_lowercase();
        }
        if let Some(category) = self.category {
            user.category = category;
        }
        if let Some(minutes) = self.minutes_allocated {
            user.minutes_allocated = minutes;
        }
        if let Some(cost) = self.monthly_plan_cost {
            user.monthly_plan_cost = cost;
        }
        if let Some(status) = self.status {
            user.status = status;
            if status == UserStatus::Active {
                user.pause_reason = None;
                user.paused_by_admin = false;
            }
        }
        if let Some(function) = &self.function {
            user.function = Some(function.clone());
        }
        if let Some(sip) = &self.sip_endpoint {
            user.sip_endpoint = Some(sip.clone());
        }
        if let Some(prompt) = &self.prompt {
            user.prompt = Some(prompt.clone());
        }
        user.updated_at = Utc::now();
    }
}

/// Status transition requested by an admin or by the user themselves.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: UserStatus,
    pub reason: Option<String>,
    pub by_admin: bool,
}

impl StatusChange {
    /// A user's own pause never replaces an admin pause: the admin flag and
    /// reason stay so only an admin can lift it.
    pub fn apply(&self, user: &mut User) {
        let keeps_admin_pause = !self.by_admin && user.paused_by_admin && self.status == UserStatus::Paused;
        user.status = self.status;
        if self.status == UserStatus::Active {
            user.pause_reason = None;
            user.paused_by_admin = false;
        } else if !keeps_admin_pause {
            user.pause_reason = self.reason.clone();
            user.paused_by_admin = self.by_admin;
        }
        user.updated_at = Utc::now();
    }
}
