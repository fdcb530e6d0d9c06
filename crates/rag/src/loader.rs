//! Knowledge base loading and bulk indexing.

use std::path::Path;
use std::sync::Arc;

use campus_core::{AppError, AppResult};

use crate::embeddings::EmbeddingProvider;
use crate::types::{Document, DocumentMetadata, VectorRecord};
use crate::vector_index::VectorIndex;

/// Outcome of a bulk indexing run. A failed document does not abort the
/// run; it is counted and the rest proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub indexed: usize,
    pub failed: usize,
}

/// Parse and validate a knowledge base JSON document array.
pub fn parse_documents(json: &str) -> AppResult<Vec<Document>> {
    let documents: Vec<Document> = serde_json::from_str(json)?;

    for (position, doc) in documents.iter().enumerate() {
        if doc.id.trim().is_empty() {
            return Err(AppError::Input(format!(
                "document at position {} has an empty id",
                position
            )));
        }
        if doc.content.trim().is_empty() {
            return Err(AppError::Input(format!(
                "document '{}' (position {}) has no content",
                doc.id, position
            )));
        }
    }

    Ok(documents)
}

/// Load and validate a knowledge base file.
pub fn load_documents(path: &Path) -> AppResult<Vec<Document>> {
    let contents = std::fs::read_to_string(path)?;
    let documents = parse_documents(&contents)?;
    tracing::info!(count = documents.len(), path = %path.display(), "Loaded knowledge base");
    Ok(documents)
}

/// Embed and upsert documents.
///
/// Per-document embedding failures are tolerated and counted; storage
/// failures while upserting the survivors are not, and propagate.
pub async fn index_documents(
    embedder: &Arc<dyn EmbeddingProvider>,
    index: &Arc<dyn VectorIndex>,
    documents: &[Document],
) -> AppResult<LoadStats> {
    let mut records = Vec::with_capacity(documents.len());
    let mut failed = 0usize;

    for doc in documents {
        match embedder.embed(&doc.embedding_text()).await {
            Ok(values) => records.push(VectorRecord {
                id: doc.id.clone(),
                values,
                metadata: DocumentMetadata::from_document(doc),
            }),
            Err(error) => {
                tracing::warn!(id = %doc.id, %error, "Skipping document: embedding failed");
                failed += 1;
            }
        }
    }

    if !records.is_empty() {
        index.upsert(&records).await?;
    }

    let stats = LoadStats {
        indexed: records.len(),
        failed,
    };
    tracing::info!(indexed = stats.indexed, failed = stats.failed, "Indexing complete");
    Ok(stats)
}
