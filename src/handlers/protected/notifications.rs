// handlers/protected/notifications.rs - Notification inbox
//
// Admins share the admin inbox (contact forms, system events). Users only see
// notifications addressed to them.
//
// GET  /api/notifications?unread_only=&limit=
// GET  /api/notifications/unread-count
// POST /api/notifications/:id/read
// POST /api/notifications/read-all

use axum::{extract::State, Extension};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::extract::{Path, Query};
use crate::database::models::Notification;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::NotificationService;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<u32>,
}

pub async fn list_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Vec<Notification>> {
    let limit = state.config.page_size(query.limit);
    let notifications = NotificationService::new(&state)
        .list(&user, query.unread_only, limit)
        .await?;
    Ok(ApiResponse::success(notifications))
}

pub async fn unread_count_get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Value> {
    let count = NotificationService::new(&state).unread_count(&user).await?;
    Ok(ApiResponse::success(json!({ "count": count })))
}

/// POST /api/notifications/:id/read - 404 unless the notification is in the caller's inbox
pub async fn read_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    NotificationService::new(&state).mark_read(&user, id).await?;
    Ok(ApiResponse::message("Notification marked as read"))
}

pub async fn read_all_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Value> {
    let count = NotificationService::new(&state).mark_all_read(&user).await?;
    Ok(ApiResponse::success(json!({
        "message": format!("{} notifications marked as read", count),
        "count": count
    })))
}
