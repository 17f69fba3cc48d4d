use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin_middleware, validate_user_middleware};
use crate::state::AppState;

/// Build the full router: public, protected and admin tiers plus global layers.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_upload_bytes))
        .layer(cors_layer(&config));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/auth/login", post(public::auth_login))
        .route("/api/auth/refresh", post(public::auth_refresh))
        .route("/api/auth/forgot-password", post(public::auth_forgot_password))
        .route("/api/auth/verify-reset-code", post(public::auth_verify_reset_code))
        .route("/api/auth/reset-password", post(public::auth_reset_password))
        .route("/api/contact", post(public::contact_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::user;

    Router::new()
        .route("/api/auth/me", get(protected::auth_me))
        .route("/api/auth/verify-pin", post(protected::auth_verify_pin))
        .route("/api/auth/change-password", post(protected::auth_change_password))
        .route("/api/auth/change-pin", post(protected::auth_change_pin))
        .route("/api/system/status", get(protected::system_status))
        .route(
            "/api/user/bot-settings",
            get(user::bot_settings_get)
                .put(user::bot_settings_put)
                .delete(user::bot_settings_delete),
        )
        .route("/api/user/call-logs", get(user::call_logs_get))
        .route("/api/user/leads", get(user::leads_get).post(user::leads_post))
        .route("/api/user/leads/upload-csv", post(user::leads_upload_csv_post))
        .route("/api/user/pause-bot", post(user::pause_bot_post))
        .route("/api/user/resume-bot", post(user::resume_bot_post))
        .route("/api/user/topup-credits", post(user::topup_credits_post))
        .route("/api/user/payment-history", get(user::payment_history_get))
        .route("/api/user/transactions", get(user::transactions_get))
        .route("/api/notifications", get(protected::notifications_list))
        .route("/api/notifications/unread-count", get(protected::notifications_unread_count))
        .route("/api/notifications/read-all", post(protected::notifications_read_all))
        .route("/api/notifications/:id/read", post(protected::notifications_read))
        // Layers run bottom-up: JWT first, then the live user lookup.
        // route_layer keeps unmatched paths a plain 404.
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/users", get(elevated::users_list).post(elevated::users_create))
        .route("/api/admin/users/:id", get(elevated::users_show).put(elevated::users_update))
        .route("/api/admin/users/:id/pause", post(elevated::users_pause))
        .route("/api/admin/users/:id/resume", post(elevated::users_resume))
        .route("/api/admin/pause-all", post(elevated::pause_all_post))
        .route("/api/admin/resume-all", post(elevated::resume_all_post))
        .route("/api/admin/overview", get(elevated::overview_get))
        .route("/api/admin/bot-settings", get(elevated::bot_settings_list))
        .route(
            "/api/admin/bot-settings/:category",
            get(elevated::bot_settings_category_get).put(elevated::bot_settings_category_put),
        )
        .route(
            "/api/admin/call-logs",
            get(elevated::call_logs_list).post(elevated::call_logs_create),
        )
        .route("/api/admin/send-update", post(elevated::send_update_post))
        .route("/api/admin/send-payment-link", post(elevated::payments_send_link))
        .route("/api/admin/payments", get(elevated::payments_list))
        .route("/api/admin/payments/:id/mark-paid", post(elevated::payments_mark_paid))
        .route("/api/admin/users-due-payment", get(elevated::payments_users_due))
        .route_layer(from_fn(require_admin_middleware))
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::auth::issue_token_pair;
    use crate::services::seed::{self, DEMO_USER_EMAIL};
    use crate::testing::test_state;

    async fn bearer_for(state: &AppState, email: &str) -> String {
        let user = state.store.user_by_email(email).await.unwrap().unwrap();
        let pair = issue_token_pair(user.id, &user.email, user.role, &state.config.security).unwrap();
        format!("Bearer {}", pair.access_token)
    }

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = app(test_state()).oneshot(get("/api/nope", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let response = app(test_state()).oneshot(get("/api/auth/me", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_route_rejects_regular_user() {
        let state = test_state();
        seed::seed(&state).await.unwrap();
        let auth = bearer_for(&state, DEMO_USER_EMAIL).await;

        let router = app(state);
        let me = router.clone().oneshot(get("/api/auth/me", Some(&auth))).await.unwrap();
        assert_eq!(me.status(), StatusCode::OK);

        let admin = router.oneshot(get("/api/admin/users", Some(&auth))).await.unwrap();
        assert_eq!(admin.status(), StatusCode::FORBIDDEN);
    }
}
