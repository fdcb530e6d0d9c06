//! Retrieval with a hard relevance gate.

use std::sync::Arc;

use campus_core::AppResult;

use crate::embeddings::EmbeddingProvider;
use crate::types::RetrievedCandidate;
use crate::vector_index::VectorIndex;

/// Embeds a query and searches the index, then applies the minimum-score
/// cutoff. The cutoff is hard: a below-threshold candidate is dropped even
/// if that leaves nothing, because an empty result is the signal the
/// pipeline uses to refuse instead of guessing.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Retrieve the top-k candidates scoring at least `min_score`.
    ///
    /// Results keep the index's descending-score order.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        min_score: f32,
    ) -> AppResult<Vec<RetrievedCandidate>> {
        let vector = self.embedder.embed(query).await?;
        let hits = self.index.query(&vector, top_k).await?;

        let total = hits.len();
        let candidates: Vec<RetrievedCandidate> =
            hits.into_iter().filter(|hit| hit.score >= min_score).collect();

        tracing::debug!(
            total,
            kept = candidates.len(),
            min_score,
            "Retrieved candidates"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory::InMemoryIndex;
    use crate::types::{DocumentMetadata, VectorRecord};
    use async_trait::async_trait;
    use campus_core::AppError;

    /// Maps texts to fixed axis vectors so similarity scores are exact.
    struct AxisEmbedder;

    #[async_trait]
    impl EmbeddingProvider for AxisEmbedder {
        fn provider_name(&self) -> &str {
            "axis"
        }

        fn model_name(&self) -> &str {
            "axis-v1"
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            crate::embeddings::provider::ensure_not_blank(texts)?;
            Ok(texts
                .iter()
                .map(|text| {
                    let lower = text.to_lowercase();
                    if lower.contains("shuttle") {
                        vec![1.0, 0.0, 0.0]
                    } else if lower.contains("housing") {
                        vec![0.0, 1.0, 0.0]
                    } else {
                        vec![0.0, 0.0, 1.0]
                    }
                })
                .collect())
        }
    }

    fn record(id: &str, values: Vec<f32>, title: &str, category: &str) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: DocumentMetadata {
                title: title.to_string(),
                category: category.to_string(),
                content: format!("{} details", title),
                keywords: String::new(),
            },
        }
    }

    async fn seeded_index() -> Arc<InMemoryIndex> {
        let index = Arc::new(InMemoryIndex::new());
        index.ensure_index(3, "cosine").await.unwrap();
        index
            .upsert(&[
                record("shuttle", vec![1.0, 0.0, 0.0], "Shuttle Schedule", "Transportation"),
                record("housing", vec![0.0, 1.0, 0.0], "Dorm Guide", "Housing"),
                // Partially aligned with the shuttle axis: cosine ≈ 0.196
                record("mixed", vec![0.2, 1.0, 0.0], "Campus Map", "General"),
            ])
            .await
            .unwrap();
        index
    }

    #[tokio::test]
    async fn test_below_threshold_candidates_dropped() {
        let index = seeded_index().await;
        let retriever = Retriever::new(Arc::new(AxisEmbedder), index);

        let candidates = retriever
            .retrieve("when does the shuttle run", 5, 0.5)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "shuttle");
        assert!((candidates[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_all_below_threshold_yields_empty() {
        let index = seeded_index().await;
        let retriever = Retriever::new(Arc::new(AxisEmbedder), index);

        // The query maps to the third axis; nothing in the index aligns
        let candidates = retriever.retrieve("library hours", 5, 0.5).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_results_keep_descending_score_order() {
        let index = seeded_index().await;
        let retriever = Retriever::new(Arc::new(AxisEmbedder), index);

        let candidates = retriever
            .retrieve("housing application", 5, 0.1)
            .await
            .unwrap();

        assert!(candidates.len() >= 2);
        for pair in candidates.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(candidates[0].id, "housing");
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_search() {
        let index = seeded_index().await;
        let retriever = Retriever::new(Arc::new(AxisEmbedder), index);

        let result = retriever.retrieve("   ", 5, 0.5).await;
        assert!(matches!(result, Err(AppError::Input(_))));
    }
}
