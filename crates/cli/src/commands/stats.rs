//! Stats command handler.

use clap::Args;

use campus_core::{AppConfig, AppResult};
use campus_rag::VectorIndex;

/// Show vector index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let index = super::index_from(config)?;
        index.ensure_index(config.dimension, "cosine").await?;

        let stats = index.stats().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("Index:      {}", config.index_name);
            println!("Vectors:    {}", stats.total_vectors);
            println!("Dimension:  {}", stats.dimension);
            println!("Fullness:   {:.4}", stats.fullness);
        }

        Ok(())
    }
}
