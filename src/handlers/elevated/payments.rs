// handlers/elevated/payments.rs - Billing administration
//
// POST /api/admin/send-payment-link       {user_id, amount, description}
// GET  /api/admin/payments
// POST /api/admin/payments/:id/mark-paid  {payment_reference}
// GET  /api/admin/users-due-payment

use axum::extract::State;
use chrono::Utc;
use uuid::Uuid;

use crate::api::extract::{Json, Path};
use crate::api::format::AdminUserView;
use crate::database::models::{Payment, SettledPayment};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::billing_service::{MarkPaidRequest, PaymentLinkRequest, PaymentLinkResult};
use crate::services::BillingService;
use crate::state::AppState;

/// POST /api/admin/send-payment-link - Issue a pending monthly bill due on the 1st of next month
pub async fn send_payment_link_post(
    State(state): State<AppState>,
    Json(payload): Json<PaymentLinkRequest>,
) -> ApiResult<PaymentLinkResult> {
    let result = BillingService::new(&state).send_payment_link(payload).await?;
    Ok(ApiResponse::created(result))
}

pub async fn list_get(State(state): State<AppState>) -> ApiResult<Vec<Payment>> {
    let payments = BillingService::new(&state).all_payments().await?;
    Ok(ApiResponse::success(payments))
}

/// POST /api/admin/payments/:id/mark-paid - Settle a pending payment. 409 if already settled.
pub async fn mark_paid_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkPaidRequest>,
) -> ApiResult<SettledPayment> {
    let settled = BillingService::new(&state).mark_paid(id, payload).await?;
    Ok(ApiResponse::success(settled))
}

/// GET /api/admin/users-due-payment - Customers billed within the due window
pub async fn users_due_get(State(state): State<AppState>) -> ApiResult<Vec<AdminUserView>> {
    let now = Utc::now();
    let users = BillingService::new(&state).users_due().await?;
    Ok(ApiResponse::success(
        users.iter().map(|user| AdminUserView::new(user, now)).collect(),
    ))
}
