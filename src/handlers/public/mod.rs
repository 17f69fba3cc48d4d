// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Routes: /, /health, /api/auth/{login,refresh,forgot-password,verify-reset-code,reset-password}, /api/contact
// Middleware: None. Every input is untrusted and validated in the services.

pub mod auth;
pub mod contact;
pub mod system;

pub use auth::{
    forgot_password_post as auth_forgot_password, login_post as auth_login, refresh_post as auth_refresh,
    reset_password_post as auth_reset_password, verify_reset_code_post as auth_verify_reset_code,
};
pub use contact::contact_post;
pub use system::{health, root};
