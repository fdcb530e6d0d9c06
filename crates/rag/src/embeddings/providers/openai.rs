//! OpenAI embedding provider.
//!
//! Calls the `/v1/embeddings` endpoint directly via reqwest.
//! API: https://platform.openai.com/docs/api-reference/embeddings

use async_trait::async_trait;
use campus_core::{AppError, AppResult, ProviderError};
use serde::{Deserialize, Serialize};

use crate::embeddings::provider::{ensure_not_blank, EmbeddingProvider};

/// The default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default embedding model and its output dimension.
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSIONS: usize = 1536;

/// Transport timeout for embedding calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// OpenAI embedding client.
pub struct OpenAiEmbeddingProvider {
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider using `text-embedding-3-small` (1536 dimensions).
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        Self::with_model(api_key, DEFAULT_MODEL, DEFAULT_DIMENSIONS)
    }

    /// Create a provider with an explicit model and dimension.
    pub fn with_model(
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> AppResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AppError::Config(
                "OpenAI API key must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
            model: model.into(),
            dimensions,
            client,
        })
    }

    #[cfg(test)]
    fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    fn map_status(status: reqwest::StatusCode, detail: String) -> ProviderError {
        match status.as_u16() {
            429 => ProviderError::RateLimited,
            401 | 403 => ProviderError::Auth(detail),
            _ => ProviderError::Other(format!("OpenAI API error ({}): {}", status, detail)),
        }
    }

    fn map_transport(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Other(format!("request failed: {}", e))
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        ensure_not_blank(texts)?;

        tracing::debug!(count = texts.len(), model = %self.model, "Requesting embeddings");

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let url = format!("{}/v1/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            tracing::error!(%status, "OpenAI embeddings error");
            return Err(Self::map_status(status, detail).into());
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            ProviderError::Other(format!("Failed to parse embeddings response: {}", e))
        })?;

        if parsed.data.len() != texts.len() {
            return Err(ProviderError::Other(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            ))
            .into());
        }

        // The API tags each embedding with its input index; sort so the
        // output order matches the input order regardless of wire order.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}
