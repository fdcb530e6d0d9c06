//! Serve command handler.

use clap::Args;

use campus_core::{AppConfig, AppResult};
use campus_server::run_server;

/// Run the HTTP API server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Bind host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut config = config.clone();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        let pipeline = super::pipeline_from(&config).await?;
        run_server(&config, pipeline).await
    }
}
