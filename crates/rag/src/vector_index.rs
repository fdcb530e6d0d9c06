//! Vector index abstraction.
//!
//! Defines a trait for provider-agnostic vector storage and similarity
//! search, with managed (Pinecone) and in-process implementations.

use async_trait::async_trait;
use campus_core::AppResult;

use crate::types::{IndexStats, RetrievedCandidate, VectorRecord};

/// Number of records sent per upsert request.
pub const UPSERT_BATCH_SIZE: usize = 100;

/// Trait for vector index backends.
///
/// Implementations must support:
/// - Idempotent index provisioning
/// - Upserting records in batches
/// - Top-k similarity search ordered by descending score
/// - Statistics, fetch by id, and deletion
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Backend name, for logs and diagnostics.
    fn backend_name(&self) -> &str;

    /// Ensure the index exists with the given dimension and metric,
    /// creating it if absent and waiting (bounded) until it is ready.
    /// Calling this against an existing index is a no-op.
    async fn ensure_index(&self, dimension: usize, metric: &str) -> AppResult<()>;

    /// Insert or update records. Implementations batch internally; a
    /// failed batch reports the record range it covered.
    async fn upsert(&self, records: &[VectorRecord]) -> AppResult<()>;

    /// Top-k most similar records, ordered by descending score.
    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievedCandidate>>;

    /// Fetch records by id. Unknown ids are silently absent from the result.
    async fn fetch(&self, ids: &[String]) -> AppResult<Vec<VectorRecord>>;

    /// Delete records by id.
    async fn delete(&self, ids: &[String]) -> AppResult<()>;

    /// Delete every record in the index.
    async fn delete_all(&self) -> AppResult<()>;

    /// Aggregate index statistics.
    async fn stats(&self) -> AppResult<IndexStats>;
}
