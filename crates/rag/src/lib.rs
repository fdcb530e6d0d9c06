//! Retrieval-augmented generation core for the campus assistant.
//!
//! This crate ties together the pipeline stages:
//! embedding → retrieval → relevance gating → prompt assembly → generation
//! → response shaping. The [`RagPipeline`] orchestrator exposes one
//! `query(text) -> StructuredAnswer` call whose interface is total: caller
//! mistakes surface as input errors, but provider and storage failures are
//! always degraded into a polite canned answer, never a raw error.

pub mod embeddings;
pub mod inmemory;
pub mod loader;
pub mod pinecone;
pub mod pipeline;
pub mod retriever;
pub mod shaper;
pub mod suggestions;
pub mod types;
pub mod vector_index;

// Re-export commonly used types
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider, OpenAiEmbeddingProvider};
pub use inmemory::InMemoryIndex;
pub use loader::{index_documents, load_documents, LoadStats};
pub use pinecone::PineconeIndex;
pub use pipeline::{error_answer, fallback_answer, PipelineConfig, RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use shaper::{PlainShaper, ResponseShaper, StructuredShaper};
pub use types::{
    Document, DocumentMetadata, IndexStats, RetrievedCandidate, SourceRef, StructuredAnswer,
    Suggestion, VectorRecord,
};
pub use vector_index::VectorIndex;
