mod common;

use anyhow::Result;
use common::{amount, test_config, TestServer, DEMO_USER_EMAIL};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn topup_adds_credits_and_writes_the_ledger() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .post(
            "/api/user/topup-credits",
            Some(&token),
            json!({ "amount": 100, "payment_method": "card" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["data"]["new_balance"]), 350.0);

    let (_, body) = server.get("/api/user/transactions", Some(&token)).await?;
    let ledger = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0]["transaction_type"], "topup");
    assert_eq!(amount(&ledger[0]["credits_before"]), 250.0);
    assert_eq!(amount(&ledger[0]["credits_after"]), 350.0);

    let (_, body) = server.get("/api/user/payment-history", Some(&token)).await?;
    let payments = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["status"], "paid");
    Ok(())
}

#[tokio::test]
async fn topup_amount_must_be_positive() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, _) = server
        .post("/api/user/topup-credits", Some(&token), json!({ "amount": 0 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/api/user/topup-credits", Some(&token), json!({ "amount": -20 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn topup_rejects_amounts_the_ledger_cannot_hold() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token().await?;

    let (status, body) = server
        .post("/api/user/topup-credits", Some(&token), json!({ "amount": 0.001 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["amount"], "Amount can have at most 2 decimal places");

    for _ in 0..2 {
        let (status, _) = server
            .post("/api/user/topup-credits", Some(&token), json!({ "amount": 5e28 }))
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = server
        .post("/api/user/topup-credits", Some(&token), json!({ "amount": 9_999_999_000_i64 }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["data"]["new_balance"]), 9_999_999_250.0);

    // Pushing the balance past its column range is refused without a stray payment
    let (status, _) = server
        .post("/api/user/topup-credits", Some(&token), json!({ "amount": 1000 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = server.get("/api/user/payment-history", Some(&token)).await?;
    let payments = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["status"], "paid");

    let (_, me) = server.get("/api/auth/me", Some(&token)).await?;
    assert_eq!(amount(&me["data"]["credits_balance"]), 9_999_999_250.0);
    Ok(())
}

#[tokio::test]
async fn payment_link_then_mark_paid_advances_billing() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let token = server.user_token().await?;
    let (_, me) = server.get("/api/auth/me", Some(&token)).await?;
    let user_id = me["data"]["id"].clone();
    let billing_before = me["data"]["days_until_billing"].as_i64().unwrap_or_default();

    let (status, body) = server
        .post(
            "/api/admin/send-payment-link",
            Some(&admin),
            json!({ "user_id": user_id, "amount": 150 }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let payment_id = body["data"]["payment_id"].as_str().unwrap_or_default().to_string();
    assert_eq!(
        body["data"]["payment_link"],
        format!("https://lumaa.ai/pay/{}", payment_id).as_str()
    );

    let (_, body) = server.get("/api/admin/payments", Some(&admin)).await?;
    let payments = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["status"], "pending");
    assert_eq!(payments[0]["transaction_type"], "monthly_bill");
    assert_eq!(payments[0]["description"], "Monthly subscription payment");

    let path = format!("/api/admin/payments/{}/mark-paid", payment_id);
    let (status, _) = server.post(&path, Some(&admin), json!({ "payment_reference": "  " })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .post(&path, Some(&admin), json!({ "payment_reference": "BANK-7781" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment"]["status"], "paid");
    assert_eq!(body["data"]["payment"]["payment_reference"], "BANK-7781");
    // Monthly bills do not touch the credit balance
    assert_eq!(amount(&body["data"]["transaction"]["credits_after"]), 250.0);

    let (status, body) = server
        .post(&path, Some(&admin), json!({ "payment_reference": "BANK-7781" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, me) = server.get("/api/auth/me", Some(&token)).await?;
    assert_eq!(me["data"]["payment_status"], "paid");
    assert!(me["data"]["days_until_billing"].as_i64().unwrap_or_default() >= billing_before + 29);
    Ok(())
}

#[tokio::test]
async fn payment_link_for_unknown_user_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let (status, _) = server
        .post(
            "/api/admin/send-payment-link",
            Some(&admin),
            json!({ "user_id": uuid::Uuid::new_v4(), "amount": 150 }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post(
            &format!("/api/admin/payments/{}/mark-paid", uuid::Uuid::new_v4()),
            Some(&admin),
            json!({ "payment_reference": "X" }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn users_due_payment_uses_the_configured_window() -> Result<()> {
    // Seeded accounts bill 30 days out
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;
    let (status, body) = server.get("/api/admin/users-due-payment", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let mut config = test_config();
    config.billing.due_window_days = 31;
    let server = TestServer::start_with(config).await?;
    let admin = server.admin_token().await?;
    let (_, body) = server.get("/api/admin/users-due-payment", Some(&admin)).await?;
    let due = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["email"], DEMO_USER_EMAIL);
    Ok(())
}
