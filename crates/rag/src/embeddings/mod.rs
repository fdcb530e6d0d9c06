//! Text embedding providers.

pub mod provider;
pub mod providers;

pub use provider::EmbeddingProvider;
pub use providers::{MockEmbeddingProvider, OpenAiEmbeddingProvider};
