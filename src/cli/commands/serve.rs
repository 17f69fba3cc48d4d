use clap::Args;

use crate::config::{AppConfig, StoreBackend};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Use the in-memory store instead of Postgres")]
    pub memory: bool,

    #[arg(long, help = "Seed demo accounts before serving")]
    pub seed: bool,
}

impl ServeArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.memory {
            config.database.backend = StoreBackend::Memory;
        }
        if self.seed {
            config.seed.on_startup = true;
        }
        config
    }
}

pub async fn handle(args: ServeArgs, config: AppConfig) -> anyhow::Result<()> {
    crate::server::run(args.apply(config)).await
}
