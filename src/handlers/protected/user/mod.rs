// handlers/protected/user/mod.rs - Self-service endpoints under /api/user/*

pub mod billing;
pub mod bot_control;
pub mod bot_settings;
pub mod call_logs;
pub mod leads;

pub use billing::{payment_history_get, topup_credits_post, transactions_get};
pub use bot_control::{pause_bot_post, resume_bot_post};
pub use bot_settings::{bot_settings_delete, bot_settings_get, bot_settings_put};
pub use call_logs::call_logs_get;
pub use leads::{leads_get, leads_post, leads_upload_csv_post};
