use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::models::*;
use crate::types::UserCategory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record not found".to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict(db.message().to_string())
            }
            // foreign key, numeric out of range, check constraint
            sqlx::Error::Database(db) if matches!(db.code().as_deref(), Some("23503" | "22003" | "23514")) => {
                StoreError::Invalid(db.message().to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Who a notification query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The shared admin inbox (`user_id IS NULL`).
    Admin,
    User(Uuid),
}

impl Audience {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Audience::Admin => None,
            Audience::User(id) => Some(*id),
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        notification.user_id == self.user_id()
    }
}

/// Persistence boundary for every record the API touches.
///
/// Methods that change more than one row (`insert_leads`, `record_call`,
/// `settle_payment`, `insert_settled_payment`, `insert_notifications`) must
/// apply all of their writes or none.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Ordered by creation time, oldest first.
    async fn list_users(&self, include_admins: bool) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User>;
    async fn set_user_status(&self, id: Uuid, change: StatusChange) -> StoreResult<User>;
    async fn set_password_hash(&self, id: Uuid, hash: &str) -> StoreResult<()>;
    async fn set_pin_hash(&self, id: Uuid, hash: &str) -> StoreResult<()>;
    async fn set_reset_code(
        &self,
        id: Uuid,
        code_hash: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> StoreResult<()>;
    async fn clear_reset_code(&self, id: Uuid) -> StoreResult<()>;

    // System
    async fn system_settings(&self) -> StoreResult<SystemSettings>;
    async fn set_global_pause(
        &self,
        paused: bool,
        reason: Option<String>,
        updated_by: Uuid,
    ) -> StoreResult<SystemSettings>;

    // Bot settings
    async fn category_settings(&self, category: UserCategory) -> StoreResult<Option<CategoryBotSettings>>;
    async fn list_category_settings(&self) -> StoreResult<Vec<CategoryBotSettings>>;
    async fn upsert_category_settings(
        &self,
        category: UserCategory,
        update: CategoryBotSettingsUpdate,
        updated_by: Option<Uuid>,
    ) -> StoreResult<CategoryBotSettings>;
    async fn user_override(&self, user_id: Uuid) -> StoreResult<Option<UserBotSettings>>;
    async fn upsert_user_override(&self, user_id: Uuid, update: UserBotSettingsUpdate) -> StoreResult<UserBotSettings>;
    /// Returns whether an override existed.
    async fn delete_user_override(&self, user_id: Uuid) -> StoreResult<bool>;

    // Leads
    async fn insert_leads(&self, user_id: Uuid, leads: Vec<NewLead>) -> StoreResult<Vec<Lead>>;
    /// Newest first.
    async fn list_leads(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<Lead>>;
    async fn lead_by_id(&self, id: Uuid) -> StoreResult<Option<Lead>>;

    // Call logs
    /// Inserts the log and adds its minutes and revenue to the user's totals.
    async fn record_call(&self, call: NewCallLog) -> StoreResult<CallLog>;
    async fn list_call_logs(&self, user_id: Uuid, limit: i64) -> StoreResult<Vec<CallLog>>;
    async fn list_call_logs_with_users(&self, limit: i64) -> StoreResult<Vec<CallLogWithUser>>;

    // Billing
    async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment>;
    async fn payment_by_id(&self, id: Uuid) -> StoreResult<Option<Payment>>;
    /// Newest first; `None` lists every user's payments.
    async fn list_payments(&self, user_id: Option<Uuid>) -> StoreResult<Vec<Payment>>;
    /// Marks a pending payment paid and applies `settlement` to its user.
    /// `Conflict` when the payment is no longer pending.
    async fn settle_payment(&self, id: Uuid, settlement: Settlement) -> StoreResult<SettledPayment>;
    /// Inserts a pending payment and settles it in one unit of work. Nothing
    /// is stored when the settlement is refused.
    async fn insert_settled_payment(&self, payment: Payment, settlement: Settlement) -> StoreResult<SettledPayment>;
    async fn list_transactions(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>>;

    // Notifications
    async fn insert_notifications(&self, notifications: Vec<NewNotification>) -> StoreResult<Vec<Notification>>;
    async fn list_notifications(&self, audience: Audience, unread_only: bool, limit: i64) -> StoreResult<Vec<Notification>>;
    async fn unread_count(&self, audience: Audience) -> StoreResult<i64>;
    /// Returns false when the id does not exist within `audience`.
    async fn mark_read(&self, id: Uuid, audience: Audience) -> StoreResult<bool>;
    async fn mark_all_read(&self, audience: Audience) -> StoreResult<u64>;
}

/// Integer digits of the `NUMERIC(12, 2)` credit, plan-cost and payment columns.
pub const CREDIT_DIGITS: u32 = 10;
/// Integer digits of the `NUMERIC(14, 2)` revenue columns.
pub const REVENUE_DIGITS: u32 = 12;

/// Exclusive magnitude bound of a money column with `integer_digits` before the point.
pub fn money_limit(integer_digits: u32) -> Decimal {
    Decimal::from(10_i64.pow(integer_digits))
}

/// Whether `value` fits a two-decimal money column without rounding or overflow.
pub fn fits_money_column(value: Decimal, integer_digits: u32) -> bool {
    value.normalize().scale() <= 2 && value.abs() < money_limit(integer_digits)
}

/// Sum of credits after applying a signed delta, never below zero.
pub fn apply_credit_delta(balance: Decimal, delta: Decimal) -> StoreResult<Decimal> {
    let after = balance
        .checked_add(delta)
        .filter(|after| *after < money_limit(CREDIT_DIGITS))
        .ok_or_else(|| StoreError::Invalid("Credit balance exceeds the supported range".to_string()))?;
    if after < Decimal::ZERO {
        return Err(StoreError::Invalid("Insufficient credits".to_string()));
    }
    Ok(after)
}

/// Running revenue total after one more call.
pub fn add_revenue(total: Decimal, revenue: Decimal) -> StoreResult<Decimal> {
    total
        .checked_add(revenue)
        .filter(|sum| *sum < money_limit(REVENUE_DIGITS))
        .ok_or_else(|| StoreError::Invalid("Revenue total exceeds the supported range".to_string()))
}

/// Running minutes total after one more call.
pub fn add_minutes(total: i32, minutes: i32) -> StoreResult<i32> {
    total
        .checked_add(minutes)
        .ok_or_else(|| StoreError::Invalid("Minutes used exceeds the supported range".to_string()))
}
