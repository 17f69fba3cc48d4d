// handlers/protected/user/billing.rs - Credits and payment history
//
// POST /api/user/topup-credits   {amount, payment_method}
// GET  /api/user/payment-history
// GET  /api/user/transactions

use axum::{extract::State, Extension};

use crate::api::extract::Json;
use crate::database::models::{Payment, Transaction};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::billing_service::{TopupRequest, TopupResult};
use crate::services::BillingService;
use crate::state::AppState;

/// POST /api/user/topup-credits - Buy credits. Settled immediately.
pub async fn topup_credits_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<TopupRequest>,
) -> ApiResult<TopupResult> {
    let result = BillingService::new(&state).topup(&user, payload).await?;
    Ok(ApiResponse::success(result))
}

pub async fn payment_history_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Payment>> {
    let payments = BillingService::new(&state).payment_history(user.id).await?;
    Ok(ApiResponse::success(payments))
}

pub async fn transactions_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Vec<Transaction>> {
    let transactions = BillingService::new(&state).transactions(user.id).await?;
    Ok(ApiResponse::success(transactions))
}
