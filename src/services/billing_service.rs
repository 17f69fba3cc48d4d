use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::database::models::{Payment, SettledPayment, Settlement, Transaction, User};
use crate::database::store::{fits_money_column, money_limit, CREDIT_DIGITS};
use crate::database::Store;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{PaymentStatus, TransactionType};

/// Whole days from `now` until `date`, floored at zero.
pub fn days_until(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (date - now).num_days().max(0)
}

/// Midnight UTC on the first day of the month after `now`.
pub fn first_of_next_month(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now)
}

/// Reject amounts a two-decimal money column would round or overflow.
pub fn check_money(field: &str, value: Decimal, integer_digits: u32) -> Result<(), ApiError> {
    if fits_money_column(value, integer_digits) {
        return Ok(());
    }
    if value.normalize().scale() > 2 {
        return Err(ApiError::field_error(field, "Amount can have at most 2 decimal places"));
    }
    Err(ApiError::field_error(
        field,
        format!("Amount must be below {}", money_limit(integer_digits)),
    ))
}

pub fn is_due(user: &User, now: DateTime<Utc>, window_days: i64) -> bool {
    user.next_billing_date <= now + Duration::days(window_days)
}

#[derive(Debug, Deserialize)]
pub struct TopupRequest {
    pub amount: Decimal,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "card".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PaymentLinkRequest {
    pub user_id: Uuid,
    pub amount: Decimal,
    #[serde(default = "default_link_description")]
    pub description: String,
}

fn default_link_description() -> String {
    "Monthly subscription payment".to_string()
}

#[derive(Debug, Deserialize)]
pub struct MarkPaidRequest {
    pub payment_reference: String,
}

#[derive(Debug, Serialize)]
pub struct TopupResult {
    pub message: String,
    pub payment_id: Uuid,
    pub transaction_id: Uuid,
    pub new_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PaymentLinkResult {
    pub message: String,
    pub payment_id: Uuid,
    pub payment_link: String,
    pub due_date: DateTime<Utc>,
}

pub struct BillingService<'a> {
    store: &'a dyn Store,
    billing: &'a BillingConfig,
}

impl<'a> BillingService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: state.store.as_ref(),
            billing: &state.config.billing,
        }
    }

    fn require_positive(amount: Decimal) -> Result<(), ApiError> {
        if amount <= Decimal::ZERO {
            return Err(ApiError::field_error("amount", "Amount must be greater than 0"));
        }
        check_money("amount", amount, CREDIT_DIGITS)
    }

    /// Create a top-up payment and settle it straight away.
    pub async fn topup(&self, user: &User, request: TopupRequest) -> Result<TopupResult, ApiError> {
        Self::require_positive(request.amount)?;

        let currency = &self.billing.currency;
        let payment = Payment {
            id: Uuid::new_v4(),
            user_id: user.id,
            amount: request.amount,
            transaction_type: TransactionType::Topup,
            status: PaymentStatus::Pending,
            description: Some(format!("Credit top-up of {} {}", request.amount, currency)),
            payment_link: None,
            payment_reference: None,
            due_date: None,
            paid_date: None,
            created_at: Utc::now(),
        };
        let reference = format!("{}-{}", request.payment_method, payment.id.simple());
        let settlement = self.settlement_for(&payment, reference);
        let settled = self.store.insert_settled_payment(payment, settlement).await?;

        info!(
            "User {} topped up {} {} via {}, credits {} -> {}",
            user.email,
            request.amount,
            currency,
            request.payment_method,
            settled.transaction.credits_before,
            settled.transaction.credits_after
        );

        Ok(TopupResult {
            message: format!("Successfully added {} {} to your account", request.amount, currency),
            payment_id: settled.payment.id,
            transaction_id: settled.transaction.id,
            new_balance: settled.transaction.credits_after,
        })
    }

    /// Issue a pending monthly bill due on the first of next month.
    pub async fn send_payment_link(&self, request: PaymentLinkRequest) -> Result<PaymentLinkResult, ApiError> {
        Self::require_positive(request.amount)?;

        let user = self
            .store
            .user_by_id(request.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let payment_id = Uuid::new_v4();
        let payment_link = format!("{}/{}", self.billing.payment_link_base, payment_id);
        let due_date = first_of_next_month(Utc::now());

        self.store
            .insert_payment(Payment {
                id: payment_id,
                user_id: user.id,
                amount: request.amount,
                transaction_type: TransactionType::MonthlyBill,
                status: PaymentStatus::Pending,
                description: Some(request.description),
                payment_link: Some(payment_link.clone()),
                payment_reference: None,
                due_date: Some(due_date),
                paid_date: None,
                created_at: Utc::now(),
            })
            .await?;

        info!("Payment link {} sent to {}", payment_link, user.email);

        Ok(PaymentLinkResult {
            message: format!("Payment link sent to {}", user.email),
            payment_id,
            payment_link,
            due_date,
        })
    }

    pub async fn mark_paid(&self, payment_id: Uuid, request: MarkPaidRequest) -> Result<SettledPayment, ApiError> {
        let reference = request.payment_reference.trim();
        if reference.is_empty() {
            return Err(ApiError::field_error("payment_reference", "Payment reference is required"));
        }
        self.settle(payment_id, reference.to_string()).await
    }

    async fn settle(&self, payment_id: Uuid, reference: String) -> Result<SettledPayment, ApiError> {
        let payment = self
            .store
            .payment_by_id(payment_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Payment not found"))?;

        let settlement = self.settlement_for(&payment, reference);
        let settled = self.store.settle_payment(payment_id, settlement).await?;
        info!(
            "Payment {} settled ({}), credits {} -> {}",
            settled.payment.id,
            settled.payment.transaction_type,
            settled.transaction.credits_before,
            settled.transaction.credits_after
        );
        Ok(settled)
    }

    /// What settling `payment` does to its user's account.
    fn settlement_for(&self, payment: &Payment, reference: String) -> Settlement {
        match payment.transaction_type {
            TransactionType::Topup => Settlement {
                payment_reference: reference,
                credit_delta: payment.amount,
                advance_billing_days: None,
                ledger_description: payment
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Credit top-up of {} {}", payment.amount, self.billing.currency)),
            },
            TransactionType::MonthlyBill => Settlement {
                payment_reference: reference,
                credit_delta: Decimal::ZERO,
                advance_billing_days: Some(self.billing.cycle_days),
                ledger_description: payment
                    .description
                    .clone()
                    .unwrap_or_else(|| "Monthly subscription payment".to_string()),
            },
            TransactionType::UsageCharge => Settlement {
                payment_reference: reference,
                credit_delta: -payment.amount,
                advance_billing_days: None,
                ledger_description: payment.description.clone().unwrap_or_else(|| "Usage charge".to_string()),
            },
        }
    }

    pub async fn payment_history(&self, user_id: Uuid) -> Result<Vec<Payment>, ApiError> {
        Ok(self.store.list_payments(Some(user_id)).await?)
    }

    pub async fn all_payments(&self) -> Result<Vec<Payment>, ApiError> {
        Ok(self.store.list_payments(None).await?)
    }

    pub async fn transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, ApiError> {
        Ok(self.store.list_transactions(user_id).await?)
    }

    /// Non-admin users whose next billing date falls inside the due window.
    pub async fn users_due(&self) -> Result<Vec<User>, ApiError> {
        let now = Utc::now();
        let window = self.billing.due_window_days;
        let users = self.store.list_users(false).await?;
        Ok(users.into_iter().filter(|u| is_due(u, now, window)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn days_until_never_negative() {
        let now = at(2024, 5, 10, 12);
        assert_eq!(days_until(at(2024, 5, 20, 12), now), 10);
        assert_eq!(days_until(at(2024, 5, 20, 11), now), 9);
        assert_eq!(days_until(at(2024, 5, 1, 0), now), 0);
    }

    #[test]
    fn money_checks_scale_and_magnitude() {
        assert!(check_money("amount", Decimal::new(10050, 2), CREDIT_DIGITS).is_ok());
        let err = check_money("amount", Decimal::new(1, 3), CREDIT_DIGITS).unwrap_err();
        assert_eq!(err.message(), "Amount can have at most 2 decimal places");
        let err = check_money("amount", Decimal::new(5, 0) * Decimal::from(10_i64.pow(12)), CREDIT_DIGITS).unwrap_err();
        assert_eq!(err.message(), "Amount must be below 10000000000");
    }

    #[test]
    fn first_of_next_month_rolls_over_year() {
        assert_eq!(first_of_next_month(at(2024, 1, 31, 23)), at(2024, 2, 1, 0));
        assert_eq!(first_of_next_month(at(2024, 12, 15, 8)), at(2025, 1, 1, 0));
    }
}
