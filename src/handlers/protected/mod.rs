// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/auth/*, /api/system/*, /api/user/*, /api/notifications/*
// Middleware: jwt_auth_middleware (AuthUser) → validate_user_middleware (CurrentUser)
//
// Every handler here receives `Extension<CurrentUser>`, the caller's account as
// currently stored, so role, status and category checks never trust stale claims.

pub mod auth;
pub mod notifications;
pub mod system;
pub mod user;

pub use auth::{
    change_password_post as auth_change_password, change_pin_post as auth_change_pin, me_get as auth_me,
    verify_pin_post as auth_verify_pin,
};
pub use notifications::{
    list_get as notifications_list, read_all_post as notifications_read_all, read_post as notifications_read,
    unread_count_get as notifications_unread_count,
};
pub use system::status_get as system_status;
