//! Deterministic offline embedding provider.

use async_trait::async_trait;
use campus_core::AppResult;

use crate::embeddings::provider::{ensure_not_blank, EmbeddingProvider};

/// Offline provider for tests and local development.
///
/// Hashes word bigrams and whole words into a fixed-dimension bag and
/// normalizes to a unit vector. Not semantically meaningful, but
/// deterministic and content-dependent: texts sharing vocabulary land
/// closer under cosine similarity than unrelated texts.
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_into(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .collect();

        for word in &words {
            let slot = Self::hash(word.as_bytes(), 31) % self.dimensions as u64;
            embedding[slot as usize] += 1.0;
        }

        // Bigrams give adjacent-word context some weight
        for pair in words.windows(2) {
            let joined = format!("{} {}", pair[0], pair[1]);
            let slot = Self::hash(joined.as_bytes(), 37) % self.dimensions as u64;
            embedding[slot as usize] += 0.5;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }

    fn hash(bytes: &[u8], seed: u64) -> u64 {
        bytes
            .iter()
            .fold(seed, |acc, b| acc.wrapping_mul(seed).wrapping_add(*b as u64))
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "hashed-bag-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        ensure_not_blank(texts)?;
        Ok(texts.iter().map(|text| self.hash_into(text)).collect())
    }
}
