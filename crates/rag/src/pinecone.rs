//! Pinecone serverless index backend.
//!
//! Talks to the control plane (`api.pinecone.io`) for provisioning and to
//! the per-index data-plane host for vector operations. The data-plane host
//! is resolved during `ensure_index`; every other operation fails with
//! `NotConnected` until then.
//!
//! API: https://docs.pinecone.io/reference/api

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use campus_core::{AppError, AppResult, StorageError};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{DocumentMetadata, IndexStats, RetrievedCandidate, VectorRecord};
use crate::vector_index::{VectorIndex, UPSERT_BATCH_SIZE};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Readiness polling after index creation: bounded, never indefinite.
const READINESS_MAX_POLLS: u32 = 30;
const READINESS_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Debug, Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<DocumentMetadata>,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, FetchedVector>,
}

#[derive(Debug, Deserialize)]
struct FetchedVector {
    id: String,
    values: Vec<f32>,
    metadata: Option<DocumentMetadata>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    ids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "deleteAll")]
    delete_all: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: usize,
    #[serde(default)]
    dimension: usize,
    #[serde(default)]
    index_fullness: f32,
}

/// Pinecone serverless client.
pub struct PineconeIndex {
    client: reqwest::Client,
    control_url: String,
    api_key: String,
    index_name: String,
    region: String,
    host: RwLock<Option<String>>,
}

impl PineconeIndex {
    /// Create a client. No network calls happen until `ensure_index`.
    pub fn new(
        api_key: impl Into<String>,
        index_name: impl Into<String>,
        region: impl Into<String>,
    ) -> AppResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(AppError::Config(
                "Pinecone API key must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            control_url: CONTROL_PLANE_URL.to_string(),
            api_key,
            index_name: index_name.into(),
            region: region.into(),
            host: RwLock::new(None),
        })
    }

    async fn data_url(&self, path: &str) -> AppResult<String> {
        let host = self.host.read().await;
        match host.as_deref() {
            Some(host) => Ok(format!("https://{}{}", host, path)),
            None => Err(StorageError::NotConnected(format!(
                "index '{}' host not resolved; call ensure_index first",
                self.index_name
            ))
            .into()),
        }
    }

    /// Describe the index. `Ok(None)` means the index does not exist.
    async fn describe(&self) -> AppResult<Option<DescribeIndexResponse>> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(transport_err)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_err("describe index", response).await.into());
        }

        let described = response
            .json::<DescribeIndexResponse>()
            .await
            .map_err(|e| StorageError::Rejected(format!("invalid describe response: {}", e)))?;
        Ok(Some(described))
    }

    async fn create(&self, dimension: usize, metric: &str) -> AppResult<()> {
        let body = CreateIndexRequest {
            name: &self.index_name,
            dimension,
            metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: "aws",
                    region: &self.region,
                },
            },
        };

        let url = format!("{}/indexes", self.control_url);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;

        // 409: another caller created it first, which is fine
        if response.status() == reqwest::StatusCode::CONFLICT {
            return Ok(());
        }
        if !response.status().is_success() {
            return Err(status_err("create index", response).await.into());
        }
        Ok(())
    }

    async fn upsert_batch(&self, batch: &[VectorRecord], start: usize) -> AppResult<()> {
        let url = self.data_url("/vectors/upsert").await?;
        let body = UpsertRequest { vectors: batch };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| batch_err(start, batch.len(), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(batch_err(start, batch.len(), format!("{}: {}", status, detail)).into());
        }
        Ok(())
    }
}

fn transport_err(e: reqwest::Error) -> StorageError {
    StorageError::Rejected(format!("pinecone request failed: {}", e))
}

async fn status_err(operation: &str, response: reqwest::Response) -> StorageError {
    let status = response.status();
    let detail = response.text().await.unwrap_or_default();
    StorageError::Rejected(format!("pinecone {} failed ({}): {}", operation, status, detail))
}

fn batch_err(start: usize, len: usize, message: String) -> AppError {
    StorageError::BatchFailed {
        start,
        end: start + len,
        message,
    }
    .into()
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn backend_name(&self) -> &str {
        "pinecone"
    }

    async fn ensure_index(&self, dimension: usize, metric: &str) -> AppResult<()> {
        if let Some(described) = self.describe().await? {
            if described.status.ready {
                tracing::debug!(index = %self.index_name, "Index already exists and is ready");
                *self.host.write().await = Some(described.host);
                return Ok(());
            }
        } else {
            tracing::info!(
                index = %self.index_name,
                dimension,
                metric,
                "Creating Pinecone serverless index"
            );
            self.create(dimension, metric).await?;
        }

        for _ in 0..READINESS_MAX_POLLS {
            tokio::time::sleep(READINESS_POLL_INTERVAL).await;
            if let Some(described) = self.describe().await? {
                if described.status.ready {
                    *self.host.write().await = Some(described.host);
                    return Ok(());
                }
            }
        }

        Err(StorageError::Rejected(format!(
            "index '{}' not ready after {} polls",
            self.index_name, READINESS_MAX_POLLS
        ))
        .into())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> AppResult<()> {
        for (batch_index, batch) in records.chunks(UPSERT_BATCH_SIZE).enumerate() {
            let start = batch_index * UPSERT_BATCH_SIZE;
            self.upsert_batch(batch, start).await?;
            tracing::debug!(start, count = batch.len(), "Upserted batch");
        }
        tracing::info!(count = records.len(), index = %self.index_name, "Upsert complete");
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> AppResult<Vec<RetrievedCandidate>> {
        let url = self.data_url("/query").await?;
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(status_err("query", response).await.into());
        }

        let parsed = response
            .json::<QueryResponse>()
            .await
            .map_err(|e| StorageError::Rejected(format!("invalid query response: {}", e)))?;

        Ok(parsed
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or_else(|| DocumentMetadata {
                    title: String::new(),
                    category: String::new(),
                    content: String::new(),
                    keywords: String::new(),
                });
                RetrievedCandidate::from_metadata(m.id, m.score, &metadata)
            })
            .collect())
    }

    async fn fetch(&self, ids: &[String]) -> AppResult<Vec<VectorRecord>> {
        let url = self.data_url("/vectors/fetch").await?;
        // Repeated `ids` query pairs; reqwest percent-encodes each value
        let params: Vec<(&str, &str)> = ids.iter().map(|id| ("ids", id.as_str())).collect();

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(status_err("fetch", response).await.into());
        }

        let parsed = response
            .json::<FetchResponse>()
            .await
            .map_err(|e| StorageError::Rejected(format!("invalid fetch response: {}", e)))?;

        Ok(parsed
            .vectors
            .into_values()
            .filter_map(|v| {
                v.metadata.map(|metadata| VectorRecord {
                    id: v.id,
                    values: v.values,
                    metadata,
                })
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> AppResult<()> {
        let url = self.data_url("/vectors/delete").await?;
        let body = DeleteRequest {
            ids: Some(ids),
            delete_all: None,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(status_err("delete", response).await.into());
        }
        Ok(())
    }

    async fn delete_all(&self) -> AppResult<()> {
        let url = self.data_url("/vectors/delete").await?;
        let body = DeleteRequest {
            ids: None,
            delete_all: Some(true),
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(status_err("delete all", response).await.into());
        }
        Ok(())
    }

    async fn stats(&self) -> AppResult<IndexStats> {
        let url = self.data_url("/describe_index_stats").await?;

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(status_err("stats", response).await.into());
        }

        let parsed = response
            .json::<StatsResponse>()
            .await
            .map_err(|e| StorageError::Rejected(format!("invalid stats response: {}", e)))?;

        Ok(IndexStats {
            total_vectors: parsed.total_vector_count,
            dimension: parsed.dimension,
            fullness: parsed.index_fullness,
        })
    }
}
