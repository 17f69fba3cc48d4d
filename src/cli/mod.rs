pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "lumaa")]
#[command(about = "Lumaa CLI - Server, database and account maintenance for the Lumaa API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, conflicts_with = "json", help = "Output in human-readable text format (default)")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply pending Postgres migrations")]
    Migrate,

    #[command(about = "Create demo accounts and default bot settings (idempotent)")]
    Seed,

    #[command(about = "Hash a password or PIN with the configured Argon2 parameters")]
    HashPassword {
        #[arg(help = "Secret to hash")]
        secret: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        match (cli.text, cli.json) {
            (false, true) => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config().clone();

    match cli.command {
        Commands::Serve(args) => commands::serve::handle(args, config).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Seed => commands::seed::handle(config, output_format).await,
        Commands::HashPassword { secret } => commands::password::handle(&secret, config, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_for(args: &[&str]) -> OutputFormat {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        OutputFormat::from_cli(&cli)
    }

    #[test]
    fn output_format_follows_flags() {
        assert!(matches!(format_for(&["lumaa", "seed"]), OutputFormat::Text));
        assert!(matches!(format_for(&["lumaa", "--text", "seed"]), OutputFormat::Text));
        assert!(matches!(format_for(&["lumaa", "seed", "--json"]), OutputFormat::Json));
    }

    #[test]
    fn text_and_json_are_exclusive() {
        assert!(Cli::try_parse_from(["lumaa", "--text", "--json", "seed"]).is_err());
    }
}
