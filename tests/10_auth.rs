mod common;

use anyhow::Result;
use common::{TestServer, ADMIN_EMAIL, DEMO_USER_EMAIL, DEMO_USER_PIN, SEED_PASSWORD};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_pair_and_profile() -> Result<()> {
    let server = TestServer::start().await?;
    let data = server.login_data(DEMO_USER_EMAIL, SEED_PASSWORD).await?;

    assert_eq!(data["token_type"], "Bearer");
    assert!(data["access_token"].as_str().is_some());
    assert!(data["refresh_token"].as_str().is_some());
    assert_eq!(data["user"]["email"], DEMO_USER_EMAIL);
    assert_eq!(data["user"]["role"], "user");
    assert!(data["user"].get("revenue_generated").is_none());
    Ok(())
}

#[tokio::test]
async fn login_is_case_insensitive_on_email() -> Result<()> {
    let server = TestServer::start().await?;
    server.login("USER@Lumaa.AI", SEED_PASSWORD).await?;
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, body) = server
        .post(
            "/api/auth/login",
            None,
            json!({ "email": DEMO_USER_EMAIL, "password": "not-the-password" }),
        )
        .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid credentials");
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn me_is_shaped_by_role() -> Result<()> {
    let server = TestServer::start().await?;

    let user_token = server.user_token().await?;
    let (status, body) = server.get("/api/auth/me", Some(&user_token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "real_estate");
    assert_eq!(body["data"]["minutes_used"], 234);
    assert!(body["data"]["days_until_billing"].as_i64().is_some());
    assert!(body["data"].get("revenue_generated").is_none());

    let admin_token = server.admin_token().await?;
    let (status, body) = server.get("/api/auth/me", Some(&admin_token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert!(body["data"].get("revenue_generated").is_some());
    Ok(())
}

#[tokio::test]
async fn refresh_issues_new_pair_and_rejects_access_tokens() -> Result<()> {
    let server = TestServer::start().await?;
    let data = server.login_data(DEMO_USER_EMAIL, SEED_PASSWORD).await?;

    let (status, body) = server
        .post(
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": data["refresh_token"] }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["data"]["access_token"].as_str().unwrap_or_default().to_string();
    let (status, _) = server.get("/api/auth/me", Some(&fresh)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .post(
            "/api/auth/refresh",
            None,
            json!({ "refresh_token": data["access_token"] }),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn refresh_token_is_not_a_bearer_token() -> Result<()> {
    let server = TestServer::start().await?;
    let data = server.login_data(DEMO_USER_EMAIL, SEED_PASSWORD).await?;
    let refresh = data["refresh_token"].as_str().unwrap_or_default();

    let (status, _) = server.get("/api/auth/me", Some(refresh)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn password_reset_flow() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server
        .post("/api/auth/forgot-password", None, json!({ "email": DEMO_USER_EMAIL }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let code = body["data"]["code"].as_str().unwrap_or_default().to_string();
    assert_eq!(code.len(), 6);

    let (status, body) = server
        .post(
            "/api/auth/verify-reset-code",
            None,
            json!({ "email": DEMO_USER_EMAIL, "code": "000000x" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired verification code");

    let (status, _) = server
        .post(
            "/api/auth/verify-reset-code",
            None,
            json!({ "email": DEMO_USER_EMAIL, "code": code }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "email": DEMO_USER_EMAIL, "code": code, "new_password": "brand-new-secret" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    server.login(DEMO_USER_EMAIL, "brand-new-secret").await?;

    // Codes are single-use
    let (status, _) = server
        .post(
            "/api/auth/reset-password",
            None,
            json!({ "email": DEMO_USER_EMAIL, "code": code, "new_password": "another-secret" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn forgot_password_does_not_reveal_unknown_accounts() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, body) = server
        .post("/api/auth/forgot-password", None, json!({ "email": "nobody@lumaa.ai" }))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("code").is_none());
    assert!(body["data"]["message"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn pin_checks_and_changes() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .post("/api/auth/verify-pin", Some(&token), json!({ "pin": "0000" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid PIN");

    let (status, _) = server
        .post("/api/auth/verify-pin", Some(&token), json!({ "pin": DEMO_USER_PIN }))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .post(
            "/api/auth/change-pin",
            Some(&token),
            json!({ "current_pin": DEMO_USER_PIN, "new_pin": "12ab" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(
            "/api/auth/change-pin",
            Some(&token),
            json!({ "current_pin": DEMO_USER_PIN, "new_pin": "24680" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = server
        .post("/api/auth/verify-pin", Some(&token), json!({ "pin": "24680" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn change_password_requires_current_password() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .post(
            "/api/auth/change-password",
            Some(&token),
            json!({ "current_password": "wrong-password", "new_password": "whatever123" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Current password is incorrect");

    let (status, _) = server
        .post(
            "/api/auth/change-password",
            Some(&token),
            json!({ "current_password": SEED_PASSWORD, "new_password": "short" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(
            "/api/auth/change-password",
            Some(&token),
            json!({ "current_password": SEED_PASSWORD, "new_password": "whatever123" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    server.login(DEMO_USER_EMAIL, "whatever123").await?;
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, body) = server.get("/api/user/bot-settings", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = server.get("/api/auth/me", Some("not-a-jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_requests_use_the_error_envelope() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server
        .post("/api/auth/login", None, json!({ "email": DEMO_USER_EMAIL }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(body["error"].as_str().is_some());

    let admin = server.admin_token().await?;
    let (status, body) = server.get("/api/admin/users/not-a-uuid", Some(&admin)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");

    let token = server.user_token().await?;
    let (status, body) = server.get("/api/user/call-logs?limit=abc", Some(&token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
