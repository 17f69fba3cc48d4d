mod common;

use anyhow::Result;
use common::TestServer;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn contact_form_lands_in_the_admin_inbox() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server
        .post(
            "/api/contact",
            None,
            json!({
                "name": "Layla",
                "email": "Layla@Example.com",
                "company": "Palm Realty",
                "message": "Interested in a demo"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "contact_form");
    assert_eq!(body["data"]["title"], "New Contact Form from Layla");
    assert_eq!(body["data"]["contact_email"], "layla@example.com");

    let admin = server.admin_token().await?;
    let (_, body) = server.get("/api/notifications/unread-count", Some(&admin)).await?;
    assert_eq!(body["data"]["count"], 1);

    let user = server.user_token().await?;
    let (_, body) = server.get("/api/notifications/unread-count", Some(&user)).await?;
    assert_eq!(body["data"]["count"], 0);
    Ok(())
}

#[tokio::test]
async fn contact_form_requires_name_and_message() -> Result<()> {
    let server = TestServer::start().await?;
    let (status, _) = server
        .post(
            "/api/contact",
            None,
            json!({ "name": " ", "email": "a@b.co", "message": "hi" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn broadcast_reaches_customers_who_can_mark_it_read() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let (status, body) = server
        .post(
            "/api/admin/send-update",
            Some(&admin),
            json!({ "subject": "Maintenance", "message": "Down for 10 minutes tonight" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users_count"], 1);
    assert_eq!(body["data"]["notification_ids"].as_array().map(Vec::len), Some(1));

    let user = server.user_token().await?;
    let (_, body) = server.get("/api/notifications?unread_only=true", Some(&user)).await?;
    let inbox = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["type"], "admin_update");
    assert_eq!(inbox[0]["title"], "Maintenance");
    let id = inbox[0]["id"].as_str().unwrap_or_default().to_string();

    // The admin inbox does not own customer notifications
    let (status, _) = server
        .post(&format!("/api/notifications/{}/read", id), Some(&admin), json!({}))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post(&format!("/api/notifications/{}/read", id), Some(&user), json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server.get("/api/notifications?unread_only=true", Some(&user)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    let (_, body) = server.get("/api/notifications", Some(&user)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn broadcast_targets_category_or_individuals() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let sales = server.create_user(&admin, "sales1@example.com", "sales", "1234").await?;
    server.create_user(&admin, "sales2@example.com", "sales", "1234").await?;

    let (_, body) = server
        .post(
            "/api/admin/send-update",
            Some(&admin),
            json!({
                "subject": "Sales tips",
                "message": "New scripts available",
                "recipient_type": "category",
                "category": "sales",
                "send_email": false
            }),
        )
        .await?;
    assert_eq!(body["data"]["users_count"], 2);
    assert_eq!(body["data"]["emails_queued"], 0);

    let (_, body) = server
        .post(
            "/api/admin/send-update",
            Some(&admin),
            json!({
                "subject": "Just you",
                "message": "Hello",
                "recipient_type": "individual",
                "recipient_ids": [sales["id"]]
            }),
        )
        .await?;
    assert_eq!(body["data"]["users_count"], 1);

    let (status, body) = server
        .post(
            "/api/admin/send-update",
            Some(&admin),
            json!({ "subject": "Oops", "message": "Hello", "recipient_type": "individual" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid recipient configuration");
    Ok(())
}

#[tokio::test]
async fn read_all_marks_only_the_callers_inbox() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    server
        .post("/api/contact", None, json!({ "name": "A", "email": "a@x.io", "message": "one" }))
        .await?;
    server
        .post("/api/contact", None, json!({ "name": "B", "email": "b@x.io", "message": "two" }))
        .await?;
    server
        .post(
            "/api/admin/send-update",
            Some(&admin),
            json!({ "subject": "Hi", "message": "Customers only" }),
        )
        .await?;

    let (status, body) = server.post("/api/notifications/read-all", Some(&admin), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let user = server.user_token().await?;
    let (_, body) = server.get("/api/notifications/unread-count", Some(&user)).await?;
    assert_eq!(body["data"]["count"], 1);
    Ok(())
}
