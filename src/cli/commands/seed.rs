use serde_json::json;

use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::config::{AppConfig, StoreBackend};
use crate::server::connect_store;
use crate::services::seed;
use crate::state::AppState;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if config.database.backend == StoreBackend::Memory {
        tracing::warn!("Seeding the in-memory store; nothing will persist after this command");
    }

    let store = connect_store(&config).await?;
    let state = AppState::new(store, config)?;
    let report = seed::seed(&state).await?;

    let message = format!(
        "Seeded {} accounts and {} category defaults",
        report.users_created.len(),
        report.categories_seeded.len()
    );
    output_success(&output_format, &message, Some(json!({ "report": report })))?;
    output_list(&output_format, &report.users_created);
    Ok(())
}
