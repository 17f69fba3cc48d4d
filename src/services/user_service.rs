use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{validate_password, validate_pin};
use crate::database::models::{NewUser, StatusChange, SystemSettings, User, UserUpdate};
use crate::database::store::CREDIT_DIGITS;
use crate::error::ApiError;
use crate::services::auth_service::AuthService;
use crate::services::billing_service::check_money;
use crate::state::AppState;
use crate::types::{UserCategory, UserRole, UserStatus};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub category: UserCategory,
    pub pin_code: String,
    pub minutes_allocated: Option<i32>,
    pub monthly_plan_cost: Option<Decimal>,
    pub credits_balance: Option<Decimal>,
    pub function: Option<String>,
    pub sip_endpoint: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub category: Option<UserCategory>,
    pub minutes_allocated: Option<i32>,
    pub monthly_plan_cost: Option<Decimal>,
    pub status: Option<UserStatus>,
    pub function: Option<String>,
    pub sip_endpoint: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminPinRequest {
    pub admin_pin: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub is_global_paused: bool,
    pub global_pause_reason: Option<String>,
    pub user_status: UserStatus,
    pub pause_reason: Option<String>,
    pub paused_by_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct TopUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub category: UserCategory,
    pub revenue: Decimal,
    pub minutes_used: i32,
}

impl From<&User> for TopUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            category: user.category,
            revenue: user.revenue_generated,
            minutes_used: user.minutes_used,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub total_revenue: Decimal,
    pub total_minutes_used: i64,
    pub total_users: usize,
    pub active_users: usize,
    pub top_users_by_revenue: Vec<TopUser>,
    pub top_users_by_minutes: Vec<TopUser>,
    pub is_global_paused: bool,
}

/// Summarise non-admin accounts for the admin dashboard.
pub fn build_overview(users: &[User], system: &SystemSettings) -> AdminOverview {
    let mut by_revenue: Vec<&User> = users.iter().collect();
    by_revenue.sort_by(|a, b| b.revenue_generated.cmp(&a.revenue_generated));

    let mut by_minutes: Vec<&User> = users.iter().collect();
    by_minutes.sort_by(|a, b| b.minutes_used.cmp(&a.minutes_used));

    AdminOverview {
        total_revenue: users.iter().map(|u| u.revenue_generated).sum(),
        total_minutes_used: users.iter().map(|u| u.minutes_used as i64).sum(),
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.status == UserStatus::Active).count(),
        top_users_by_revenue: by_revenue.into_iter().take(5).map(TopUser::from).collect(),
        top_users_by_minutes: by_minutes.into_iter().take(5).map(TopUser::from).collect(),
        is_global_paused: system.is_global_paused,
    }
}

const ADMIN_PAUSED: &str = "Your bot was paused by an administrator. Contact support to resume.";

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_plan_cost(cost: Option<Decimal>) -> Result<(), ApiError> {
    match cost {
        Some(cost) if cost < Decimal::ZERO => Err(ApiError::field_error(
            "monthly_plan_cost",
            "Monthly plan cost cannot be negative",
        )),
        Some(cost) => check_money("monthly_plan_cost", cost, CREDIT_DIGITS),
        None => Ok(()),
    }
}

fn normalize_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(ApiError::field_error("email", "Invalid email address"));
    }
    Ok(email)
}

/// Account administration and pause control.
pub struct UserService<'a> {
    state: &'a AppState,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn get(&self, id: Uuid) -> Result<User, ApiError> {
        self.state
            .store
            .user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub async fn list_customers(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.state.store.list_users(false).await?)
    }

    /// Create a regular (non-admin) account.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::field_error("name", "Name is required"));
        }
        let email = normalize_email(&request.email)?;
        validate_password(&request.password)?;
        validate_pin(request.pin_code.trim())?;

        if request.minutes_allocated.is_some_and(|m| m < 0) {
            return Err(ApiError::field_error("minutes_allocated", "Minutes allocated cannot be negative"));
        }
        check_plan_cost(request.monthly_plan_cost)?;
        if let Some(credits) = request.credits_balance {
            if credits < Decimal::ZERO {
                return Err(ApiError::field_error("credits_balance", "Credits balance cannot be negative"));
            }
            check_money("credits_balance", credits, CREDIT_DIGITS)?;
        }

        let billing = &self.state.config.billing;
        let password_hash = self.state.hasher.hash_async(&request.password).await?;
        let pin_hash = self.state.hasher.hash_async(request.pin_code.trim()).await?;

        let user = self
            .state
            .store
            .insert_user(NewUser {
                name,
                email,
                password_hash,
                pin_hash: Some(pin_hash),
                role: UserRole::User,
                category: request.category,
                function: non_blank(request.function),
                sip_endpoint: non_blank(request.sip_endpoint),
                prompt: non_blank(request.prompt),
                minutes_allocated: request.minutes_allocated.unwrap_or(billing.default_minutes_allocated),
                minutes_used: 0,
                credits_balance: request.credits_balance.unwrap_or(Decimal::ZERO),
                monthly_plan_cost: request.monthly_plan_cost.unwrap_or(billing.default_plan_cost),
                next_billing_date: Utc::now() + Duration::days(billing.cycle_days),
            })
            .await?;

        info!("Created user {} ({})", user.email, user.category);
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, ApiError> {
        let name = match request.name {
            Some(name) if name.trim().is_empty() => {
                return Err(ApiError::field_error("name", "Name cannot be empty"))
            }
            other => other.map(|n| n.trim().to_string()),
        };
        let email = request.email.as_deref().map(normalize_email).transpose()?;
        if request.minutes_allocated.is_some_and(|m| m < 0) {
            return Err(ApiError::field_error("minutes_allocated", "Minutes allocated cannot be negative"));
        }
        check_plan_cost(request.monthly_plan_cost)?;

        let update = UserUpdate {
            name,
            email,
            category: request.category,
            minutes_allocated: request.minutes_allocated,
            monthly_plan_cost: request.monthly_plan_cost,
            status: request.status,
            function: request.function,
            sip_endpoint: request.sip_endpoint,
            prompt: request.prompt,
        };
        if update.is_empty() {
            return Err(ApiError::bad_request("No fields to update"));
        }

        let user = self.state.store.update_user(id, update).await?;
        info!("Updated user {}", user.email);
        Ok(user)
    }

    /// Admin actions that need the acting admin's own PIN.
    async fn require_admin_pin(&self, admin: &User, pin: &str) -> Result<(), ApiError> {
        if AuthService::new(self.state).pin_matches(admin, pin).await {
            Ok(())
        } else {
            warn!("Admin {} supplied an invalid PIN", admin.email);
            Err(ApiError::forbidden("Invalid PIN. Admin PIN required for this action."))
        }
    }

    pub async fn admin_pause(&self, admin: &User, id: Uuid, request: AdminPinRequest) -> Result<User, ApiError> {
        self.require_admin_pin(admin, &request.admin_pin).await?;
        let reason = non_blank(request.reason).or_else(|| Some("Paused by administrator".to_string()));

        let user = self
            .state
            .store
            .set_user_status(
                id,
                StatusChange {
                    status: UserStatus::Paused,
                    reason,
                    by_admin: true,
                },
            )
            .await?;
        info!("Admin {} paused user {}", admin.email, user.email);
        Ok(user)
    }

    pub async fn admin_resume(&self, admin: &User, id: Uuid) -> Result<User, ApiError> {
        let user = self
            .state
            .store
            .set_user_status(
                id,
                StatusChange {
                    status: UserStatus::Active,
                    reason: None,
                    by_admin: false,
                },
            )
            .await?;
        info!("Admin {} resumed user {}", admin.email, user.email);
        Ok(user)
    }

    pub async fn pause_all(&self, admin: &User, request: AdminPinRequest) -> Result<SystemSettings, ApiError> {
        self.require_admin_pin(admin, &request.admin_pin).await?;
        let reason = non_blank(request.reason).or_else(|| Some("System maintenance".to_string()));
        let settings = self.state.store.set_global_pause(true, reason, admin.id).await?;
        warn!("Global pause enabled by {}", admin.email);
        Ok(settings)
    }

    pub async fn resume_all(&self, admin: &User) -> Result<SystemSettings, ApiError> {
        let settings = self.state.store.set_global_pause(false, None, admin.id).await?;
        info!("Global pause lifted by {}", admin.email);
        Ok(settings)
    }

    pub async fn self_pause(&self, user: &User, request: PinRequest) -> Result<User, ApiError> {
        AuthService::new(self.state).verify_pin(user, &request.pin).await?;
        if user.status == UserStatus::Blocked {
            return Err(ApiError::forbidden("Your account is blocked. Contact support."));
        }
        if user.paused_by_admin {
            warn!("User {} tried to re-pause over an admin pause", user.email);
            return Err(ApiError::forbidden(ADMIN_PAUSED));
        }

        let user = self
            .state
            .store
            .set_user_status(
                user.id,
                StatusChange {
                    status: UserStatus::Paused,
                    reason: Some("Paused by user".to_string()),
                    by_admin: false,
                },
            )
            .await?;
        info!("User {} paused their bot", user.email);
        Ok(user)
    }

    pub async fn self_resume(&self, user: &User, request: PinRequest) -> Result<User, ApiError> {
        AuthService::new(self.state).verify_pin(user, &request.pin).await?;
        if user.status == UserStatus::Blocked {
            return Err(ApiError::forbidden("Your account is blocked. Contact support."));
        }
        if user.paused_by_admin {
            warn!("User {} tried to resume an admin pause", user.email);
            return Err(ApiError::forbidden(ADMIN_PAUSED));
        }

        let user = self
            .state
            .store
            .set_user_status(
                user.id,
                StatusChange {
                    status: UserStatus::Active,
                    reason: None,
                    by_admin: false,
                },
            )
            .await?;
        info!("User {} resumed their bot", user.email);
        Ok(user)
    }

    pub async fn system_status(&self, user: &User) -> Result<SystemStatus, ApiError> {
        let system = self.state.store.system_settings().await?;
        Ok(SystemStatus {
            is_global_paused: system.is_global_paused,
            global_pause_reason: system.pause_reason,
            user_status: user.status,
            pause_reason: user.pause_reason.clone(),
            paused_by_admin: user.paused_by_admin,
        })
    }

    pub async fn overview(&self) -> Result<AdminOverview, ApiError> {
        let users = self.state.store.list_users(false).await?;
        let system = self.state.store.system_settings().await?;
        Ok(build_overview(&users, &system))
    }
}
