//! Index command handler.
//!
//! Loads a knowledge base JSON file, embeds the documents, and upserts
//! them into the vector index.

use clap::Args;

use campus_core::{AppConfig, AppResult};
use campus_rag::{index_documents, load_documents, VectorIndex};

/// Load and index a knowledge base file
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Path to the knowledge base JSON file
    #[arg(short, long)]
    pub file: std::path::PathBuf,

    /// Delete all existing vectors before indexing
    #[arg(long)]
    pub reset: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let documents = load_documents(&self.file)?;

        let embedder = super::embedder_from(config)?;
        let index = super::index_from(config)?;
        index.ensure_index(config.dimension, "cosine").await?;

        if self.reset {
            tracing::warn!("Resetting index before load");
            index.delete_all().await?;
        }

        let stats = index_documents(&embedder, &index, &documents).await?;

        println!("Indexed {} documents ({} failed)", stats.indexed, stats.failed);
        Ok(())
    }
}
