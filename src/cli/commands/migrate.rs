use anyhow::Context;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::{AppConfig, StoreBackend};
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if config.database.backend == StoreBackend::Memory {
        anyhow::bail!("The in-memory store has no schema to migrate; unset STORE=memory");
    }

    let manager = DatabaseManager::connect(&config.database)
        .await
        .context("could not connect to Postgres")?;
    manager.health_check().await?;
    manager.migrate().await?;
    manager.close().await;

    output_success(&output_format, "Migrations applied", None)
}
