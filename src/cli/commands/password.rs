use serde_json::json;

use crate::auth::password::SecretHasher;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Print an Argon2id hash suitable for the `password_hash` or `pin_hash` columns.
pub fn handle(secret: &str, config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let hasher = SecretHasher::new(&config.security)?;
    let hash = hasher.hash(secret)?;

    match output_format {
        OutputFormat::Json => output_success(&output_format, "Secret hashed", Some(json!({ "hash": hash }))),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}
