use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::format::ProfileView;
use crate::auth::password::{validate_password, validate_pin};
use crate::auth::{decode_token, digest_reset_code, generate_reset_code, issue_token_pair, TokenType};
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_RESET_CODE: &str = "Invalid or expired verification code";
pub const SYSTEM_PAUSED: &str = "System is currently paused for maintenance";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResetCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePinRequest {
    pub current_pin: String,
    pub new_pin: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: ProfileView,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Credentials, tokens and PIN checks.
pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let email = request.email.trim().to_lowercase();
        let user = match self.state.store.user_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                warn!("Login failed: unknown or inactive account {}", email);
                return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        if !self.state.hasher.verify_async(&request.password, &user.password_hash).await {
            warn!("Login failed: wrong password for {}", email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        self.ensure_not_globally_paused(&user).await?;
        info!("User {} logged in ({})", user.email, user.role);
        self.token_response(&user)
    }

    pub async fn refresh(&self, request: RefreshRequest) -> Result<LoginResponse, ApiError> {
        let claims = decode_token(&request.refresh_token, TokenType::Refresh, &self.state.config.security)?;

        let user = match self.state.store.user_by_id(claims.sub).await? {
            Some(user) if user.is_active => user,
            _ => return Err(ApiError::unauthorized("User no longer exists or is inactive")),
        };

        self.ensure_not_globally_paused(&user).await?;
        self.token_response(&user)
    }

    /// Admins pass through the global pause; everyone else gets 503.
    async fn ensure_not_globally_paused(&self, user: &User) -> Result<(), ApiError> {
        if user.role.is_admin() {
            return Ok(());
        }
        let system = self.state.store.system_settings().await?;
        if system.is_global_paused {
            warn!("Login refused for {}: system is globally paused", user.email);
            return Err(ApiError::service_unavailable(SYSTEM_PAUSED));
        }
        Ok(())
    }

    fn token_response(&self, user: &User) -> Result<LoginResponse, ApiError> {
        let pair = issue_token_pair(user.id, &user.email, user.role, &self.state.config.security)?;
        Ok(LoginResponse {
            user: ProfileView::for_user(user, Utc::now()),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        })
    }

    /// Check `pin` against the user's stored PIN hash.
    pub async fn pin_matches(&self, user: &User, pin: &str) -> bool {
        match &user.pin_hash {
            Some(hash) => self.state.hasher.verify_async(pin.trim(), hash).await,
            None => false,
        }
    }

    pub async fn verify_pin(&self, user: &User, pin: &str) -> Result<(), ApiError> {
        if self.pin_matches(user, pin).await {
            Ok(())
        } else {
            warn!("PIN verification failed for {}", user.email);
            Err(ApiError::unauthorized("Invalid PIN"))
        }
    }

    pub async fn change_password(&self, user: &User, request: ChangePasswordRequest) -> Result<(), ApiError> {
        if !self.state.hasher.verify_async(&request.current_password, &user.password_hash).await {
            warn!("Password change rejected for {}: wrong current password", user.email);
            return Err(ApiError::bad_request("Current password is incorrect"));
        }
        validate_password(&request.new_password)?;

        let hash = self.state.hasher.hash_async(&request.new_password).await?;
        self.state.store.set_password_hash(user.id, &hash).await?;
        info!("Password changed for {}", user.email);
        Ok(())
    }

    pub async fn change_pin(&self, user: &User, request: ChangePinRequest) -> Result<(), ApiError> {
        self.verify_pin(user, &request.current_pin).await?;
        let new_pin = request.new_pin.trim();
        validate_pin(new_pin)?;

        let hash = self.state.hasher.hash_async(new_pin).await?;
        self.state.store.set_pin_hash(user.id, &hash).await?;
        info!("PIN changed for {}", user.email);
        Ok(())
    }

    /// Always succeeds so the response never reveals whether the account exists.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<ForgotPasswordResponse, ApiError> {
        let email = request.email.trim().to_lowercase();
        let generic = ForgotPasswordResponse {
            message: "If the email exists, a verification code has been sent",
            code: None,
        };

        let user = match self.state.store.user_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => return Ok(generic),
        };

        let security = &self.state.config.security;
        let code = generate_reset_code();
        let expires_at = Utc::now() + Duration::minutes(security.reset_code_ttl_minutes);
        self.state
            .store
            .set_reset_code(user.id, &digest_reset_code(&code), expires_at)
            .await?;

        // Outbound mail is not wired up; the code goes to the log instead.
        info!("Password reset code for {} issued, expires at {}", user.email, expires_at);
        tracing::debug!("Password reset code for {}: {}", user.email, code);

        Ok(ForgotPasswordResponse {
            code: security.expose_reset_code.then_some(code),
            ..generic
        })
    }

    async fn user_with_valid_code(&self, email: &str, code: &str) -> Result<User, ApiError> {
        let email = email.trim().to_lowercase();
        let user = self
            .state
            .store
            .user_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::bad_request(INVALID_RESET_CODE))?;

        let valid = match (&user.reset_code_hash, user.reset_code_expires_at) {
            (Some(stored), Some(expires_at)) => {
                expires_at > Utc::now() && *stored == digest_reset_code(code)
            }
            _ => false,
        };

        if !valid {
            warn!("Invalid or expired reset code presented for {}", email);
            return Err(ApiError::bad_request(INVALID_RESET_CODE));
        }
        Ok(user)
    }

    pub async fn verify_reset_code(&self, request: VerifyResetCodeRequest) -> Result<(), ApiError> {
        self.user_with_valid_code(&request.email, &request.code).await?;
        Ok(())
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), ApiError> {
        let user = self.user_with_valid_code(&request.email, &request.code).await?;
        validate_password(&request.new_password)?;

        let hash = self.state.hasher.hash_async(&request.new_password).await?;
        self.state.store.set_password_hash(user.id, &hash).await?;
        self.state.store.clear_reset_code(user.id).await?;
        info!("Password reset completed for {}", user.email);
        Ok(())
    }
}
