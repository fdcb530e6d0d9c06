//! The embedding provider trait.

use async_trait::async_trait;
use campus_core::{AppError, AppResult};

/// Produces fixed-dimension vectors for text.
///
/// Implementations must preserve order: `embed_batch` returns exactly one
/// vector per input text, in input order, or fails the whole batch.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name, for logs and diagnostics.
    fn provider_name(&self) -> &str;

    /// The model identifier vectors are produced with.
    fn model_name(&self) -> &str;

    /// Output vector dimension.
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts. One vector per text, same order.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Embed a single text. Blank input is a caller mistake, rejected
    /// before any network call.
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        ensure_not_blank(&[text.to_string()])?;
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            AppError::Input("embedding provider returned no vector for input".to_string())
        })
    }
}

/// Reject blank texts before they reach a provider.
pub fn ensure_not_blank(texts: &[String]) -> AppResult<()> {
    for (position, text) in texts.iter().enumerate() {
        if text.trim().is_empty() {
            return Err(AppError::Input(format!(
                "cannot embed blank text (input {})",
                position
            )));
        }
    }
    Ok(())
}
