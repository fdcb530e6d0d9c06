use std::sync::Arc;

use async_trait::async_trait;
use campus_core::AppResult;
use campus_llm::{ChatClient, ChatRequest, ChatResponse};
use campus_rag::embeddings::provider::ensure_not_blank;
use campus_rag::{
    EmbeddingProvider, InMemoryIndex, RagPipeline, StructuredAnswer, VectorIndex,
};
use campus_server::{app_router, AppState, IndexResponseBody};
use serde_json::{json, Value};

struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn provider_name(&self) -> &str {
        "keyword"
    }

    fn model_name(&self) -> &str {
        "keyword-v1"
    }

    fn dimensions(&self) -> usize {
        3
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        ensure_not_blank(texts)?;
        Ok(texts
            .iter()
            .map(|text| {
                if text.to_lowercase().contains("shuttle") {
                    vec![1.0, 0.0, 0.0]
                } else {
                    vec![0.0, 0.0, 1.0]
                }
            })
            .collect())
    }
}

struct CannedGenerator;

#[async_trait]
impl ChatClient for CannedGenerator {
    fn provider_name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _request: &ChatRequest) -> AppResult<ChatResponse> {
        Ok(ChatResponse {
            content: "The shuttle runs every 30 minutes.".to_string(),
            model: "canned-v1".to_string(),
            usage: Default::default(),
        })
    }
}

async fn spawn_server() -> (String, tokio::task::JoinHandle<()>) {
    let index = Arc::new(InMemoryIndex::new());
    index.ensure_index(3, "cosine").await.expect("init index");
    spawn_server_with_index(index).await
}

async fn spawn_server_with_index(
    index: Arc<InMemoryIndex>,
) -> (String, tokio::task::JoinHandle<()>) {
    let pipeline = RagPipeline::builder()
        .with_embedder(Arc::new(KeywordEmbedder))
        .with_vector_index(index)
        .with_generator(Arc::new(CannedGenerator))
        .build()
        .expect("build pipeline");

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let app = app_router(state, &["http://localhost:3000".to_string()]);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn health_includes_vector_store_stats() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", base))
        .send()
        .await
        .expect("health response");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("health json");
    assert_eq!(body["status"], "healthy");
    assert!(body.get("vector_store_stats").is_some());
    assert_eq!(body["vector_store_stats"]["total_vectors"], 0);
    assert_eq!(body["vector_store_stats"]["dimension"], 3);

    handle.abort();
}

#[tokio::test]
async fn health_degrades_with_error_detail_when_index_unreachable() {
    // ensure_index never called: stats() fails with NotConnected
    let (base, handle) = spawn_server_with_index(Arc::new(InMemoryIndex::new())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", base))
        .send()
        .await
        .expect("health response");

    let body: Value = response.json().await.expect("health json");
    assert_eq!(body["status"], "degraded");
    assert!(body["vector_store_stats"].is_null());
    assert!(body["error"].as_str().unwrap_or_default().contains("not connected"));

    handle.abort();
}

#[tokio::test]
async fn index_then_chat_round_trip() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let indexed = client
        .post(format!("{}/api/index/documents", base))
        .json(&json!([{
            "id": "shuttle-1",
            "title": "Shuttle Schedule",
            "category": "Transportation",
            "content": "The shuttle bus runs every 30 minutes.",
            "keywords": ["bus", "shuttle"]
        }]))
        .send()
        .await
        .expect("index response");
    assert!(indexed.status().is_success());

    let body: IndexResponseBody = indexed.json().await.expect("index json");
    assert_eq!(body.status, "success");
    assert_eq!(body.indexed_count, 1);
    assert_eq!(body.failed_count, 0);

    let stats = client
        .get(format!("{}/api/index/stats", base))
        .send()
        .await
        .expect("stats response");
    let stats: Value = stats.json().await.expect("stats json");
    assert_eq!(stats["total_vectors"], 1);

    let chat = client
        .post(format!("{}/api/chat", base))
        .json(&json!({"message": "When does the shuttle run?"}))
        .send()
        .await
        .expect("chat response");
    assert!(chat.status().is_success());

    let answer: StructuredAnswer = chat.json().await.expect("chat json");
    assert_eq!(answer.answer, "The shuttle runs every 30 minutes.");
    assert_eq!(answer.sources.len(), 1);
    assert!(answer.suggestions.iter().any(|s| s.id == "bus_schedule"));

    handle.abort();
}

#[tokio::test]
async fn blank_message_is_rejected_with_400() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/chat", base))
        .json(&json!({"message": "   "}))
        .send()
        .await
        .expect("chat response");
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error json");
    assert!(body["error"].as_str().unwrap_or_default().contains("empty"));

    handle.abort();
}

#[tokio::test]
async fn unanswerable_question_gets_fallback_not_error() {
    let (base, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/chat", base))
        .json(&json!({"message": "What is the meaning of life?"}))
        .send()
        .await
        .expect("chat response");
    assert!(response.status().is_success());

    let answer: StructuredAnswer = response.json().await.expect("chat json");
    assert!(answer.sources.is_empty());
    assert!(answer.suggestions.iter().any(|s| s.id == "portal_search"));

    handle.abort();
}
