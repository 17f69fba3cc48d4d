use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{PaymentStatus, TransactionType};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub description: Option<String>,
    pub payment_link: Option<String>,
    pub payment_reference: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    #[sqlx(try_from = "String")]
    pub transaction_type: TransactionType,
    pub description: String,
    pub credits_before: Decimal,
    pub credits_after: Decimal,
    pub created_at: DateTime<Utc>,
}

/// User-side effect of settling a payment, decided by the billing service.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub payment_reference: String,
    pub credit_delta: Decimal,
    /// Advance `next_billing_date` by this many days and mark the user paid.
    pub advance_billing_days: Option<i64>,
    pub ledger_description: String,
}

/// The settled payment together with the ledger entry it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SettledPayment {
    pub payment: Payment,
    pub transaction: Transaction,
}
