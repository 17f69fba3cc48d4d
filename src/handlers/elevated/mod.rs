// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Security Level: JWT Authentication + admin or superadmin role
// Route Prefix: /api/admin/*
// Middleware: jwt_auth_middleware → validate_user_middleware → require_admin_middleware
//
// Role is checked against the stored account, not the token claims, so a
// demoted admin loses access on the next request.
//
// Sensitive actions (pausing a user, the global pause) additionally require
// the acting admin's own PIN in the request body.

pub mod bot_settings;
pub mod broadcast;
pub mod call_logs;
pub mod overview;
pub mod payments;
pub mod system;
pub mod users;

pub use bot_settings::{
    category_get as bot_settings_category_get, category_put as bot_settings_category_put,
    list_get as bot_settings_list,
};
pub use broadcast::send_update_post;
pub use call_logs::{create_post as call_logs_create, list_get as call_logs_list};
pub use overview::overview_get;
pub use payments::{
    list_get as payments_list, mark_paid_post as payments_mark_paid,
    send_payment_link_post as payments_send_link, users_due_get as payments_users_due,
};
pub use system::{pause_all_post, resume_all_post};
pub use users::{
    create_post as users_create, list_get as users_list, pause_post as users_pause,
    resume_post as users_resume, show_get as users_show, update_put as users_update,
};
