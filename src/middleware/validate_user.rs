use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The caller's account as currently stored, injected by `validate_user_middleware`
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that loads the user named in the JWT claims.
/// Rejects tokens whose account has since been removed or deactivated.
pub async fn validate_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Get AuthUser from JWT middleware
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let user = state
        .store
        .user_by_id(auth_user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Store error validating user {}: {}", auth_user.user_id, e);
            ApiError::internal_server_error("Failed to validate user")
        })?;

    let user = match user {
        Some(user) if user.is_active => user,
        _ => {
            tracing::warn!(
                "User validation failed: {} ({}) not found or inactive",
                auth_user.email,
                auth_user.user_id
            );
            return Err(ApiError::unauthorized("User not found or inactive"));
        }
    };

    tracing::debug!("User validation successful: {} ({})", user.email, user.role);

    // Inject validated user into request
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
