use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{ContactDetails, NewNotification, Notification, User};
use crate::database::Audience;
use crate::error::ApiError;
use crate::services::bot_settings_service::parse_category;
use crate::state::AppState;
use crate::types::NotificationKind;

#[derive(Debug, Deserialize)]
pub struct ContactFormRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    All,
    Category,
    Individual,
}

fn default_recipient_type() -> RecipientType {
    RecipientType::All
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub subject: String,
    pub message: String,
    #[serde(default = "default_recipient_type")]
    pub recipient_type: RecipientType,
    pub category: Option<String>,
    pub recipient_ids: Option<Vec<Uuid>>,
    #[serde(default = "default_true")]
    pub send_notification: bool,
    #[serde(default = "default_true")]
    pub send_email: bool,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResult {
    pub message: String,
    pub users_count: usize,
    pub notification_ids: Vec<Uuid>,
    pub emails_queued: usize,
}

/// Admins read the shared inbox; everyone else reads their own notifications.
pub fn audience_for(user: &User) -> Audience {
    if user.role.is_admin() {
        Audience::Admin
    } else {
        Audience::User(user.id)
    }
}

pub struct NotificationService<'a> {
    state: &'a AppState,
}

impl<'a> NotificationService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self, user: &User, unread_only: bool, limit: i64) -> Result<Vec<Notification>, ApiError> {
        Ok(self
            .state
            .store
            .list_notifications(audience_for(user), unread_only, limit)
            .await?)
    }

    pub async fn unread_count(&self, user: &User) -> Result<i64, ApiError> {
        Ok(self.state.store.unread_count(audience_for(user)).await?)
    }

    pub async fn mark_read(&self, user: &User, id: Uuid) -> Result<(), ApiError> {
        if self.state.store.mark_read(id, audience_for(user)).await? {
            Ok(())
        } else {
            Err(ApiError::not_found("Notification not found"))
        }
    }

    pub async fn mark_all_read(&self, user: &User) -> Result<u64, ApiError> {
        Ok(self.state.store.mark_all_read(audience_for(user)).await?)
    }

    /// File a public contact-form submission into the admin inbox.
    pub async fn submit_contact(&self, request: ContactFormRequest) -> Result<Notification, ApiError> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let message = request.message.trim().to_string();
        if name.is_empty() || message.is_empty() {
            return Err(ApiError::validation_error("Missing required fields (name, message)", None));
        }
        if !email.contains('@') {
            return Err(ApiError::field_error("email", "Invalid email address"));
        }

        let mut inserted = self
            .state
            .store
            .insert_notifications(vec![NewNotification {
                user_id: None,
                kind: NotificationKind::ContactForm,
                title: format!("New Contact Form from {}", name),
                message,
                data: None,
                contact: ContactDetails {
                    name: Some(name),
                    email: Some(email),
                    phone: request.phone.filter(|p| !p.trim().is_empty()),
                    company: request.company.filter(|c| !c.trim().is_empty()),
                },
            }])
            .await?;

        let notification = inserted
            .pop()
            .ok_or_else(|| ApiError::internal_server_error("Notification was not stored"))?;
        info!("Contact form received from {:?}", notification.contact_email);
        Ok(notification)
    }

    async fn resolve_recipients(&self, request: &BroadcastRequest) -> Result<Vec<User>, ApiError> {
        let invalid = || ApiError::bad_request("Invalid recipient configuration");
        let customers = self.state.store.list_users(false).await?;

        match request.recipient_type {
            RecipientType::All => Ok(customers),
            RecipientType::Category => {
                let raw = request.category.as_deref().ok_or_else(invalid)?;
                let category = parse_category(raw)?;
                Ok(customers.into_iter().filter(|u| u.category == category).collect())
            }
            RecipientType::Individual => {
                let ids = request.recipient_ids.as_ref().filter(|ids| !ids.is_empty()).ok_or_else(invalid)?;
                Ok(customers.into_iter().filter(|u| ids.contains(&u.id)).collect())
            }
        }
    }

    /// Fan an admin update out to the resolved recipients.
    pub async fn broadcast(&self, admin: &User, request: BroadcastRequest) -> Result<BroadcastResult, ApiError> {
        let subject = request.subject.trim().to_string();
        if subject.is_empty() || request.message.trim().is_empty() {
            return Err(ApiError::validation_error("Missing required fields (subject, message)", None));
        }

        let recipients = self.resolve_recipients(&request).await?;

        let notification_ids = if request.send_notification && !recipients.is_empty() {
            let batch = recipients
                .iter()
                .map(|user| NewNotification {
                    user_id: Some(user.id),
                    kind: NotificationKind::AdminUpdate,
                    title: subject.clone(),
                    message: request.message.clone(),
                    data: Some(serde_json::json!({ "sent_by": admin.id })),
                    contact: ContactDetails::default(),
                })
                .collect();
            self.state
                .store
                .insert_notifications(batch)
                .await?
                .into_iter()
                .map(|n| n.id)
                .collect()
        } else {
            Vec::new()
        };

        // No mail transport is configured; record what would have been sent.
        let emails_queued = if request.send_email {
            for user in &recipients {
                info!("Update email '{}' to {}", subject, user.email);
            }
            recipients.len()
        } else {
            0
        };

        if recipients.is_empty() {
            warn!("Broadcast '{}' from {} matched no recipients", subject, admin.email);
        }
        info!(
            "Admin {} sent update '{}' to {} users",
            admin.email,
            subject,
            recipients.len()
        );

        Ok(BroadcastResult {
            message: format!("Update sent to {} users", recipients.len()),
            users_count: recipients.len(),
            notification_ids,
            emails_queued,
        })
    }
}
