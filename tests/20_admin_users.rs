mod common;

use anyhow::Result;
use common::{amount, TestServer, ADMIN_PIN, DEMO_USER_EMAIL, DEMO_USER_PIN};
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn admin_routes_reject_regular_users() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server.get("/api/admin/users", Some(&token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
    Ok(())
}

#[tokio::test]
async fn list_excludes_admins_and_includes_billing() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let (status, body) = server.get("/api/admin/users", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], DEMO_USER_EMAIL);
    assert!(users[0].get("revenue_generated").is_some());
    assert!(users[0]["days_until_billing"].as_i64().is_some());
    Ok(())
}

#[tokio::test]
async fn create_user_applies_defaults_and_rejects_duplicates() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let user = server.create_user(&token, "New.Agent@Example.com", "sales", "4321").await?;
    assert_eq!(user["email"], "new.agent@example.com");
    assert_eq!(user["role"], "user");
    assert_eq!(user["category"], "sales");
    assert_eq!(user["status"], "active");
    assert_eq!(user["minutes_allocated"], 1000);
    assert_eq!(amount(&user["monthly_plan_cost"]), 150.0);
    assert_eq!(amount(&user["credits_balance"]), 0.0);

    let (status, body) = server
        .post(
            "/api/admin/users",
            Some(&token),
            json!({
                "name": "Someone Else",
                "email": "new.agent@example.com",
                "password": "password123",
                "category": "healthcare",
                "pin_code": "1111"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // The new account can log in straight away
    server.login("new.agent@example.com", common::SEED_PASSWORD).await?;
    Ok(())
}

#[tokio::test]
async fn create_user_validates_input() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;

    let base = json!({
        "name": "Bad Input",
        "email": "bad@example.com",
        "password": "password123",
        "category": "sales",
        "pin_code": "1234"
    });

    let mut short_password = base.clone();
    short_password["password"] = json!("short");
    let (status, _) = server.post("/api/admin/users", Some(&token), short_password).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_pin = base.clone();
    bad_pin["pin_code"] = json!("12");
    let (status, _) = server.post("/api/admin/users", Some(&token), bad_pin).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad_email = base.clone();
    bad_email["email"] = json!("not-an-email");
    let (status, _) = server.post("/api/admin/users", Some(&token), bad_email).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn show_and_update_user() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.admin_token().await?;
    let user = server.create_user(&token, "agent@example.com", "hospitality", "2468").await?;
    let id = user["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = server.get(&format!("/api/admin/users/{}", id), Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "hospitality");

    let (status, body) = server
        .put(
            &format!("/api/admin/users/{}", id),
            Some(&token),
            json!({ "name": "Renamed Agent", "minutes_allocated": 2500, "category": "automotive" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Renamed Agent");
    assert_eq!(body["data"]["minutes_allocated"], 2500);
    assert_eq!(body["data"]["category"], "automotive");

    let (status, body) = server
        .put(&format!("/api/admin/users/{}", id), Some(&token), json!({}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields to update");

    let (status, _) = server
        .put(
            &format!("/api/admin/users/{}", id),
            Some(&token),
            json!({ "email": DEMO_USER_EMAIL }),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let missing = Uuid::new_v4();
    let (status, _) = server.get(&format!("/api/admin/users/{}", missing), Some(&token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_pause_needs_admin_pin_and_blocks_self_resume() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let user_token = server.user_token().await?;

    let (_, me) = server.get("/api/auth/me", Some(&user_token)).await?;
    let id = me["data"]["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = server
        .post(
            &format!("/api/admin/users/{}/pause", id),
            Some(&admin),
            json!({ "admin_pin": "9999", "reason": "Overdue invoice" }),
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid PIN. Admin PIN required for this action.");

    let (status, body) = server
        .post(
            &format!("/api/admin/users/{}/pause", id),
            Some(&admin),
            json!({ "admin_pin": ADMIN_PIN, "reason": "Overdue invoice" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paused");
    assert_eq!(body["data"]["pause_reason"], "Overdue invoice");
    assert_eq!(body["data"]["paused_by_admin"], true);

    // Paused users can still log in and see why
    let data = server.login_data(DEMO_USER_EMAIL, common::SEED_PASSWORD).await?;
    assert_eq!(data["user"]["status"], "paused");

    let (status, _) = server
        .post("/api/user/resume-bot", Some(&user_token), json!({ "pin": DEMO_USER_PIN }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .post(&format!("/api/admin/users/{}/resume", id), Some(&admin), json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["paused_by_admin"], false);
    assert!(body["data"]["pause_reason"].is_null());
    Ok(())
}

#[tokio::test]
async fn self_pause_cannot_replace_an_admin_pause() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let user_token = server.user_token().await?;

    let (_, me) = server.get("/api/auth/me", Some(&user_token)).await?;
    let id = me["data"]["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = server
        .post(
            &format!("/api/admin/users/{}/pause", id),
            Some(&admin),
            json!({ "admin_pin": ADMIN_PIN, "reason": "Compliance review" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server
        .post("/api/user/pause-bot", Some(&user_token), json!({ "pin": DEMO_USER_PIN }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Your bot was paused by an administrator. Contact support to resume."
    );

    let (status, _) = server
        .post("/api/user/resume-bot", Some(&user_token), json!({ "pin": DEMO_USER_PIN }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = server.get(&format!("/api/admin/users/{}", id), Some(&admin)).await?;
    assert_eq!(body["data"]["status"], "paused");
    assert_eq!(body["data"]["paused_by_admin"], true);
    assert_eq!(body["data"]["pause_reason"], "Compliance review");
    Ok(())
}

#[tokio::test]
async fn self_pause_and_resume() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, _) = server
        .post("/api/user/pause-bot", Some(&token), json!({ "pin": "0000" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .post("/api/user/pause-bot", Some(&token), json!({ "pin": DEMO_USER_PIN }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paused");
    assert_eq!(body["data"]["paused_by_admin"], false);

    let (status, body) = server.get("/api/system/status", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_status"], "paused");
    assert_eq!(body["data"]["is_global_paused"], false);

    let (status, body) = server
        .post("/api/user/resume-bot", Some(&token), json!({ "pin": DEMO_USER_PIN }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
    Ok(())
}

#[tokio::test]
async fn blocked_user_cannot_resume() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let user = server.create_user(&admin, "blocked@example.com", "sales", "1357").await?;
    let id = user["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = server
        .put(&format!("/api/admin/users/{}", id), Some(&admin), json!({ "status": "blocked" }))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let token = server.login("blocked@example.com", common::SEED_PASSWORD).await?;
    let (status, _) = server
        .post("/api/user/resume-bot", Some(&token), json!({ "pin": "1357" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn overview_summarises_customers() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    server.create_user(&admin, "second@example.com", "sales", "1234").await?;

    let (status, body) = server.get("/api/admin/overview", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_users"], 2);
    assert_eq!(data["active_users"], 2);
    assert_eq!(data["total_minutes_used"], 234);
    assert_eq!(data["is_global_paused"], false);
    assert_eq!(data["top_users_by_minutes"][0]["email"], DEMO_USER_EMAIL);
    Ok(())
}
