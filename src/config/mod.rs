use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub billing: BillingConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Postgres connection string; required when `backend` is Postgres.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub reset_code_ttl_minutes: i64,
    /// Return password-reset codes in the API response instead of only logging them.
    pub expose_reset_code: bool,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub currency: String,
    pub cycle_days: i64,
    pub due_window_days: i64,
    pub default_plan_cost: rust_decimal::Decimal,
    pub default_minutes_allocated: i32,
    pub payment_link_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub on_startup: bool,
    pub demo_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("LUMAA_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        match env::var("STORE").as_deref() {
            Ok("memory") => self.database.backend = StoreBackend::Memory,
            Ok("postgres") => self.database.backend = StoreBackend::Postgres,
            _ => {}
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Ok(v) = env::var("API_MAX_UPLOAD_BYTES") {
            self.api.max_upload_bytes = v.parse().unwrap_or(self.api.max_upload_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ACCESS_TOKEN_MINUTES") {
            self.security.access_token_minutes = v.parse().unwrap_or(self.security.access_token_minutes);
        }
        if let Ok(v) = env::var("SECURITY_REFRESH_TOKEN_DAYS") {
            self.security.refresh_token_days = v.parse().unwrap_or(self.security.refresh_token_days);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_RESET_CODE_TTL_MINUTES") {
            self.security.reset_code_ttl_minutes = v.parse().unwrap_or(self.security.reset_code_ttl_minutes);
        }
        if let Ok(v) = env::var("SECURITY_EXPOSE_RESET_CODE") {
            self.security.expose_reset_code = v.parse().unwrap_or(self.security.expose_reset_code);
        }
        if let Ok(v) = env::var("ARGON2_MEMORY_KIB") {
            self.security.argon2_memory_kib = v.parse().unwrap_or(self.security.argon2_memory_kib);
        }
        if let Ok(v) = env::var("ARGON2_ITERATIONS") {
            self.security.argon2_iterations = v.parse().unwrap_or(self.security.argon2_iterations);
        }
        if let Ok(v) = env::var("ARGON2_PARALLELISM") {
            self.security.argon2_parallelism = v.parse().unwrap_or(self.security.argon2_parallelism);
        }

        // Billing overrides
        if let Ok(v) = env::var("BILLING_CYCLE_DAYS") {
            self.billing.cycle_days = v.parse().unwrap_or(self.billing.cycle_days);
        }
        if let Ok(v) = env::var("BILLING_DUE_WINDOW_DAYS") {
            self.billing.due_window_days = v.parse().unwrap_or(self.billing.due_window_days);
        }
        if let Ok(v) = env::var("BILLING_DEFAULT_PLAN_COST") {
            self.billing.default_plan_cost = v.parse().unwrap_or(self.billing.default_plan_cost);
        }
        if let Ok(v) = env::var("BILLING_PAYMENT_LINK_BASE") {
            self.billing.payment_link_base = v.trim_end_matches('/').to_string();
        }

        // Seed overrides
        if let Ok(v) = env::var("SEED_ON_STARTUP") {
            self.seed.on_startup = v.parse().unwrap_or(self.seed.on_startup);
        }
        if let Ok(v) = env::var("SEED_DEMO_PASSWORD") {
            self.seed.demo_password = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8001,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                default_page_size: 100,
                max_page_size: 1000,
                max_upload_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                jwt_secret: "lumaa-development-secret".to_string(),
                access_token_minutes: 30,
                refresh_token_days: 7,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                reset_code_ttl_minutes: 15,
                expose_reset_code: true,
                argon2_memory_kib: 19 * 1024,
                argon2_iterations: 2,
                argon2_parallelism: 1,
            },
            billing: BillingConfig::default(),
            seed: SeedConfig {
                on_startup: true,
                demo_password: "changeme123".to_string(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8001,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                default_page_size: 100,
                max_page_size: 500,
                max_upload_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_minutes: 30,
                refresh_token_days: 7,
                enable_cors: true,
                cors_origins: vec!["https://staging.lumaa.ai".to_string()],
                reset_code_ttl_minutes: 15,
                expose_reset_code: false,
                argon2_memory_kib: 19 * 1024,
                argon2_iterations: 2,
                argon2_parallelism: 1,
            },
            billing: BillingConfig::default(),
            seed: SeedConfig {
                on_startup: false,
                demo_password: "changeme123".to_string(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8001,
            },
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                default_page_size: 100,
                max_page_size: 500,
                max_upload_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_minutes: 30,
                refresh_token_days: 7,
                enable_cors: true,
                cors_origins: vec!["https://app.lumaa.ai".to_string()],
                reset_code_ttl_minutes: 15,
                expose_reset_code: false,
                argon2_memory_kib: 64 * 1024,
                argon2_iterations: 3,
                argon2_parallelism: 1,
            },
            billing: BillingConfig::default(),
            seed: SeedConfig {
                on_startup: false,
                demo_password: String::new(),
            },
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Clamp a requested page size to the configured bounds.
    pub fn page_size(&self, requested: Option<u32>) -> i64 {
        let size = requested.unwrap_or(self.api.default_page_size).max(1);
        size.min(self.api.max_page_size) as i64
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            cycle_days: 30,
            due_window_days: 3,
            default_plan_cost: rust_decimal::Decimal::new(150, 0),
            default_minutes_allocated: 1000,
            payment_link_base: "https://lumaa.ai/pay".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
