// handlers/public/contact.rs - POST /api/contact handler

use axum::extract::State;

use crate::api::extract::Json;
use crate::database::models::Notification;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::notification_service::ContactFormRequest;
use crate::services::NotificationService;
use crate::state::AppState;

/// POST /api/contact - Public contact form. Lands in the admin inbox.
pub async fn contact_post(
    State(state): State<AppState>,
    Json(payload): Json<ContactFormRequest>,
) -> ApiResult<Notification> {
    let notification = NotificationService::new(&state).submit_contact(payload).await?;
    Ok(ApiResponse::created(notification))
}
