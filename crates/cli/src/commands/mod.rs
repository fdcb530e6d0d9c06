//! Command handlers for the campus CLI.

mod chat;
mod index;
mod serve;
mod stats;

pub use chat::ChatCommand;
pub use index::IndexCommand;
pub use serve::ServeCommand;
pub use stats::StatsCommand;

use std::sync::Arc;

use campus_core::{AppConfig, AppError, AppResult};
use campus_llm::create_client;
use campus_rag::{
    EmbeddingProvider, OpenAiEmbeddingProvider, PineconeIndex, PipelineConfig, RagPipeline,
    VectorIndex,
};

fn embedder_from(config: &AppConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;
    let provider =
        OpenAiEmbeddingProvider::with_model(api_key, &config.embedding_model, config.dimension)?;
    Ok(Arc::new(provider))
}

fn index_from(config: &AppConfig) -> AppResult<Arc<dyn VectorIndex>> {
    let api_key = config
        .pinecone_api_key
        .as_deref()
        .ok_or_else(|| AppError::Config("PINECONE_API_KEY is not set".to_string()))?;
    let index = PineconeIndex::new(api_key, &config.index_name, &config.pinecone_environment)?;
    Ok(Arc::new(index))
}

/// Construct the full pipeline and provision the index. Commands share
/// this so every entry point wires providers identically.
async fn pipeline_from(config: &AppConfig) -> AppResult<Arc<RagPipeline>> {
    let embedder = embedder_from(config)?;
    let index = index_from(config)?;
    index.ensure_index(config.dimension, "cosine").await?;

    let generator = create_client("openai", None, config.openai_api_key.as_deref())?;

    let pipeline = RagPipeline::builder()
        .with_config(PipelineConfig::from_app_config(config))
        .with_embedder(embedder)
        .with_vector_index(index)
        .with_generator(generator)
        .build()?;

    Ok(Arc::new(pipeline))
}
