// handlers/elevated/users.rs - Customer account administration
//
// GET  /api/admin/users
// POST /api/admin/users
// GET  /api/admin/users/:id
// PUT  /api/admin/users/:id
// POST /api/admin/users/:id/pause   {admin_pin, reason?}
// POST /api/admin/users/:id/resume

use axum::{extract::State, Extension};
use chrono::Utc;
use uuid::Uuid;

use crate::api::extract::{Json, Path};
use crate::api::format::AdminUserView;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::services::user_service::{AdminPinRequest, CreateUserRequest, UpdateUserRequest};
use crate::services::UserService;
use crate::state::AppState;

/// GET /api/admin/users - Every non-admin account with revenue and billing
pub async fn list_get(State(state): State<AppState>) -> ApiResult<Vec<AdminUserView>> {
    let now = Utc::now();
    let users = UserService::new(&state).list_customers().await?;
    Ok(ApiResponse::success(
        users.iter().map(|user| AdminUserView::new(user, now)).collect(),
    ))
}

/// POST /api/admin/users - Create a customer account
///
/// Expected Input:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "password": "string",          // At least 8 characters
///   "category": "real_estate",
///   "pin_code": "1234",            // 4-6 digits
///   "minutes_allocated": 1000,     // Optional
///   "monthly_plan_cost": 150,      // Optional
///   "credits_balance": 0,          // Optional
///   "function": "string",          // Optional
///   "sip_endpoint": "string",      // Optional
///   "prompt": "string"             // Optional
/// }
/// ```
///
/// The role is always `user`; admins are only created by seeding.
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<AdminUserView> {
    let user = UserService::new(&state).create(payload).await?;
    Ok(ApiResponse::created(AdminUserView::new(&user, Utc::now())))
}

pub async fn show_get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<AdminUserView> {
    let user = UserService::new(&state).get(id).await?;
    Ok(ApiResponse::success(AdminUserView::new(&user, Utc::now())))
}

pub async fn update_put(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<AdminUserView> {
    let user = UserService::new(&state).update(id, payload).await?;
    Ok(ApiResponse::success(AdminUserView::new(&user, Utc::now())))
}

/// POST /api/admin/users/:id/pause - Admin pause. The user cannot self-resume it.
pub async fn pause_post(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminPinRequest>,
) -> ApiResult<AdminUserView> {
    let user = UserService::new(&state).admin_pause(&admin, id, payload).await?;
    Ok(ApiResponse::success(AdminUserView::new(&user, Utc::now())))
}

pub async fn resume_post(
    State(state): State<AppState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<AdminUserView> {
    let user = UserService::new(&state).admin_resume(&admin, id).await?;
    Ok(ApiResponse::success(AdminUserView::new(&user, Utc::now())))
}
