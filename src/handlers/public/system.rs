// handlers/public/system.rs - GET / and GET /health handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - API descriptor
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Lumaa API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Call-center backend for AI voice agents",
            "environment": state.config.environment,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/api/auth/login, /api/auth/refresh, /api/auth/forgot-password, /api/auth/verify-reset-code, /api/auth/reset-password (public)",
                "contact": "/api/contact (public)",
                "auth": "/api/auth/me, /api/auth/verify-pin, /api/auth/change-password, /api/auth/change-pin (protected)",
                "system": "/api/system/status (protected)",
                "user": "/api/user/* (protected)",
                "notifications": "/api/notifications/* (protected)",
                "admin": "/api/admin/* (restricted, admin role required)",
            }
        }
    }))
}

/// GET /health - Store connectivity check. 503 when the store cannot be reached.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
