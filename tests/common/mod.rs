#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use lumaa_api::config::{AppConfig, StoreBackend};
use lumaa_api::database::MemoryStore;
use lumaa_api::services::seed;
use lumaa_api::state::AppState;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

pub use lumaa_api::services::seed::{ADMIN_EMAIL, ADMIN_PIN, DEMO_USER_EMAIL, DEMO_USER_PIN};

pub const SEED_PASSWORD: &str = "changeme123";

/// An in-process server over a fresh, seeded in-memory store.
///
/// Every test gets its own instance so global flags (like the system pause)
/// never leak between tests.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    client: reqwest::Client,
}

/// Development defaults with Argon2 turned down to keep hashing fast.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = StoreBackend::Memory;
    config.security.argon2_memory_kib = 1024;
    config.security.argon2_iterations = 1;
    config.security.expose_reset_code = true;
    config.seed.on_startup = false;
    config.seed.demo_password = SEED_PASSWORD.to_string();
    config.api.enable_request_logging = false;
    config
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(test_config()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        let state = AppState::new(Arc::new(MemoryStore::new()), config)?;
        seed::seed(&state).await?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let router = lumaa_api::app(state.clone());
        tokio::spawn(async move {
            let _ = axum_serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request and return the status with the parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Log in and return the full `data` payload.
    pub async fn login_data(&self, email: &str, password: &str) -> Result<Value> {
        let (status, body) = self
            .post("/api/auth/login", None, json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login for {} failed: {} {}", email, status, body);
        Ok(body["data"].clone())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let data = self.login_data(email, password).await?;
        data["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response had no access_token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.login(ADMIN_EMAIL, SEED_PASSWORD).await
    }

    pub async fn user_token(&self) -> Result<String> {
        self.login(DEMO_USER_EMAIL, SEED_PASSWORD).await
    }

    /// Create a customer through the admin API and return the admin view.
    pub async fn create_user(&self, admin_token: &str, email: &str, category: &str, pin: &str) -> Result<Value> {
        let (status, body) = self
            .post(
                "/api/admin/users",
                Some(admin_token),
                json!({
                    "name": "Test Customer",
                    "email": email,
                    "password": SEED_PASSWORD,
                    "category": category,
                    "pin_code": pin,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create user failed: {} {}", status, body);
        Ok(body["data"].clone())
    }
}

async fn axum_serve(listener: tokio::net::TcpListener, router: axum::Router) -> std::io::Result<()> {
    axum::serve(listener, router).await
}

/// Compare a JSON number against an expected decimal amount.
pub fn amount(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}
