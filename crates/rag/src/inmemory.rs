//! In-process vector index.
//!
//! Cosine similarity over a guarded map. Used by tests, local development,
//! and anywhere a managed index is overkill.

use std::collections::HashMap;

use async_trait::async_trait;
use campus_core::{AppResult, StorageError};
use tokio::sync::RwLock;

use crate::types::{IndexStats, RetrievedCandidate, VectorRecord};
use crate::vector_index::VectorIndex;

#[derive(Debug)]
struct State {
    dimension: usize,
    records: HashMap<String, VectorRecord>,
}

/// In-memory index. `ensure_index` must run before any other operation,
/// matching the provisioning step managed backends require.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    state: RwLock<Option<State>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn not_connected() -> StorageError {
    StorageError::NotConnected("in-memory index not initialized; call ensure_index".to_string())
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    fn backend_name(&self) -> &str {
        "in-memory"
    }

    async fn ensure_index(&self, dimension: usize, _metric: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.as_ref() {
            Some(existing) if existing.dimension != dimension => {
                Err(StorageError::Rejected(format!(
                    "index already exists with dimension {}, requested {}",
                    existing.dimension, dimension
                ))
                .into())
            }
            Some(_) => Ok(()),
            None => {
                *state = Some(State {
                    dimension,
                    records: HashMap::new(),
                });
                Ok(())
            }
        }
    }

    async fn upsert(&self, records: &[VectorRecord]) -> AppResult<()> {
        let mut state = self.state.write().await;
        let state = state.as_mut().ok_or_else(not_connected)?;

        for record in records {
            if record.values.len() != state.dimension {
                return Err(StorageError::Rejected(format!(
                    "record '{}' has dimension {}, index expects {}",
                    record.id,
                    record.values.len(),
                    state.dimension
                ))
                .into());
            }
        }

        for record in records {
            state.records.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievedCandidate>> {
        let state = self.state.read().await;
        let state = state.as_ref().ok_or_else(not_connected)?;

        let mut scored: Vec<RetrievedCandidate> = state
            .records
            .values()
            .map(|record| {
                RetrievedCandidate::from_metadata(
                    record.id.clone(),
                    cosine_similarity(vector, &record.values),
                    &record.metadata,
                )
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn fetch(&self, ids: &[String]) -> AppResult<Vec<VectorRecord>> {
        let state = self.state.read().await;
        let state = state.as_ref().ok_or_else(not_connected)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.records.get(id).cloned())
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> AppResult<()> {
        let mut state = self.state.write().await;
        let state = state.as_mut().ok_or_else(not_connected)?;
        for id in ids {
            state.records.remove(id);
        }
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        let state = state.as_mut().ok_or_else(not_connected)?;
        state.records.clear();
        Ok(())
    }

    async fn stats(&self) -> AppResult<IndexStats> {
        let state = self.state.read().await;
        let state = state.as_ref().ok_or_else(not_connected)?;
        Ok(IndexStats {
            total_vectors: state.records.len(),
            dimension: state.dimension,
            fullness: 0.0,
        })
    }
}
