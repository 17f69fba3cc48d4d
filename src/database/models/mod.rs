pub mod billing;
pub mod bot_settings;
pub mod call_log;
pub mod lead;
pub mod notification;
pub mod system;
pub mod user;

pub use billing::{Payment, SettledPayment, Settlement, Transaction};
pub use bot_settings::{CategoryBotSettings, CategoryBotSettingsUpdate, UserBotSettings, UserBotSettingsUpdate};
pub use call_log::{CallLog, CallLogWithUser, NewCallLog};
pub use lead::{Lead, NewLead};
pub use notification::{ContactDetails, NewNotification, Notification};
pub use system::SystemSettings;
pub use user::{NewUser, StatusChange, User, UserUpdate};
