mod common;

use anyhow::Result;
use common::TestServer;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn user_sees_seeded_category_defaults() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server.get("/api/user/bot-settings", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["category"], "real_estate");
    assert_eq!(
        data["opening_message"],
        "Hello! I'm an AI assistant specialized in Real Estate. How can I help you today?"
    );
    assert_eq!(data["model"], "gpt-4");
    assert_eq!(data["has_user_override"], false);
    assert_eq!(data["source"]["opening_message"], "category");
    Ok(())
}

#[tokio::test]
async fn override_resolves_per_field_and_resets() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .put(
            "/api/user/bot-settings",
            Some(&token),
            json!({ "opening_message": "  Welcome to Dubai Homes!  " }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["opening_message"], "Welcome to Dubai Homes!");
    assert_eq!(data["source"]["opening_message"], "user");
    assert_eq!(data["source"]["prompt"], "category");
    assert_eq!(data["has_user_override"], true);

    // A later partial update keeps the earlier field
    let (_, body) = server
        .put("/api/user/bot-settings", Some(&token), json!({ "prompt": "Speak Arabic first." }))
        .await?;
    assert_eq!(body["data"]["opening_message"], "Welcome to Dubai Homes!");
    assert_eq!(body["data"]["prompt"], "Speak Arabic first.");

    let (status, body) = server.delete("/api/user/bot-settings", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_user_override"], false);
    assert_eq!(body["data"]["source"]["opening_message"], "category");
    Ok(())
}

#[tokio::test]
async fn override_enforces_length_limits() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .put(
            "/api/user/bot-settings",
            Some(&token),
            json!({ "opening_message": "x".repeat(501) }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = server
        .put("/api/user/bot-settings", Some(&token), json!({ "prompt": "y".repeat(2001) }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn blank_override_values_are_ignored() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .put("/api/user/bot-settings", Some(&token), json!({ "opening_message": "   " }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_user_override"], false);
    Ok(())
}

#[tokio::test]
async fn admin_manages_category_settings() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let (status, body) = server.get("/api/admin/bot-settings", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(5));

    let (status, body) = server
        .put(
            "/api/admin/bot-settings/real_estate",
            Some(&admin),
            json!({ "model": "claude-3", "temperature": 0.2 }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["model"], "claude-3");
    assert_eq!(body["data"]["temperature"], 0.2);
    // Untouched fields survive a partial update
    assert!(body["data"]["prompt"].as_str().is_some_and(|p| p.contains("Real Estate")));

    let (_, body) = server.get("/api/admin/bot-settings/real_estate", Some(&admin)).await?;
    assert_eq!(body["data"]["model"], "claude-3");

    // Users inherit the new engine settings
    let token = server.user_token().await?;
    let (_, body) = server.get("/api/user/bot-settings", Some(&token)).await?;
    assert_eq!(body["data"]["model"], "claude-3");
    assert_eq!(body["data"]["temperature"], 0.2);
    Ok(())
}

#[tokio::test]
async fn category_settings_validation() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let (status, _) = server.get("/api/admin/bot-settings/plumbing", Some(&admin)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .put("/api/admin/bot-settings/sales", Some(&admin), json!({ "temperature": 2.5 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let user = server.user_token().await?;
    let (status, _) = server.get("/api/admin/bot-settings", Some(&user)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
