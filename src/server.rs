use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::app::app;
use crate::config::{AppConfig, StoreBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::services::seed;
use crate::state::AppState;

/// Open the configured store, applying migrations first when enabled.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config.database.backend {
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let manager = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                manager.migrate().await?;
            }
            Ok(Arc::new(PgStore::new(manager.pool())))
        }
    }
}

/// Store, hasher and config wired together, with startup checks applied.
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store = connect_store(&config).await?;
    let state = AppState::new(store, config).context("invalid password hashing parameters")?;

    if state.config.seed.on_startup {
        let report = seed::seed(&state).await?;
        if !report.users_created.is_empty() {
            info!("Seeded accounts: {}", report.users_created.join(", "));
        }
    }

    Ok(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        "Starting Lumaa API in {:?} mode ({:?} store)",
        config.environment, config.database.backend
    );

    let state = build_state(config).await?;
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Lumaa API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
