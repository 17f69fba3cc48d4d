pub mod auth_service;
pub mod billing_service;
pub mod bot_settings_service;
pub mod call_log_service;
pub mod lead_service;
pub mod notification_service;
pub mod seed;
pub mod user_service;

pub use auth_service::AuthService;
pub use billing_service::BillingService;
pub use bot_settings_service::BotSettingsService;
pub use call_log_service::CallLogService;
pub use lead_service::LeadService;
pub use notification_service::NotificationService;
pub use user_service::UserService;
