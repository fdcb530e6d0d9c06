//! Router, handlers, and server startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use campus_core::{AppConfig, AppError, AppResult};
use campus_prompt::ChatTurn;
use campus_rag::{index_documents, Document, RagPipeline, StructuredAnswer};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

/// Request body for `POST /api/chat`.
///
/// `user_profile` and `session_id` belong to the host's session layer;
/// they are accepted for interface compatibility but the core holds no
/// session state.
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub user_profile: Option<serde_json::Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response body for `POST /api/index/documents`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponseBody {
    pub status: String,
    pub indexed_count: usize,
    pub failed_count: usize,
}

/// Map a pipeline error to an HTTP response. Input errors are the
/// caller's fault; everything else is a 500 (and should be rare, since
/// the pipeline degrades provider failures into answers itself).
fn error_response(error: AppError) -> Response {
    let (status, message) = match &error {
        AppError::Input(message) => (StatusCode::BAD_REQUEST, message.clone()),
        _ => {
            error!(%error, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    };
    (status, Json(json!({ "error": message }))).into_response()
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> Response {
    if let Some(session_id) = &body.session_id {
        tracing::debug!(%session_id, "Chat request");
    }
    match state.pipeline.query(&body.message, &body.history).await {
        Ok(answer) => Json::<StructuredAnswer>(answer).into_response(),
        Err(error) => error_response(error),
    }
}

async fn index_docs(
    State(state): State<AppState>,
    Json(documents): Json<Vec<Document>>,
) -> Response {
    let pipeline = &state.pipeline;
    let result = index_documents(pipeline.embedder(), pipeline.vector_index(), &documents).await;
    match result {
        Ok(stats) => Json(IndexResponseBody {
            status: "success".to_string(),
            indexed_count: stats.indexed,
            failed_count: stats.failed,
        })
        .into_response(),
        Err(error) => error_response(error),
    }
}

async fn index_stats(State(state): State<AppState>) -> Response {
    match state.pipeline.vector_index().stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(error) => error_response(error),
    }
}

async fn health(State(state): State<AppState>) -> Response {
    match state.pipeline.vector_index().stats().await {
        Ok(stats) => Json(json!({
            "status": "healthy",
            "service": "campus-assistant",
            "vector_store_stats": stats,
        }))
        .into_response(),
        // Operators get the raw error here; chat callers never do
        Err(error) => Json(json!({
            "status": "degraded",
            "service": "campus-assistant",
            "vector_store_stats": null,
            "error": error.to_string(),
        }))
        .into_response(),
    }
}

/// Build the CORS layer from the configured origin allowlist. Origins
/// that fail header parsing are skipped with a warning rather than
/// taking the server down.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

pub fn app_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/index/documents", post(index_docs))
        .route("/api/index/stats", get(index_stats))
        .route("/api/health", get(health))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
}

/// Bind and serve until the task is cancelled.
pub async fn run_server(config: &AppConfig, pipeline: Arc<RagPipeline>) -> AppResult<()> {
    let state = AppState { pipeline };
    let app = app_router(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| {
            AppError::Config(format!("invalid host/port: {}:{}", config.host, config.port))
        })?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("campus assistant listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_history_defaults_to_empty() {
        let body: ChatRequestBody =
            serde_json::from_str(r#"{"message": "When is the next bus?"}"#).unwrap();
        assert_eq!(body.message, "When is the next bus?");
        assert!(body.history.is_empty());
    }

    #[test]
    fn test_chat_request_parses_history() {
        let raw = r#"{
            "message": "And on weekends?",
            "history": [
                {"role": "user", "content": "When is the next bus?"},
                {"role": "assistant", "content": "Every 30 minutes."}
            ]
        }"#;
        let body: ChatRequestBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.history.len(), 2);
    }

    #[test]
    fn test_cors_layer_skips_bad_origins() {
        // Must not panic on an unparsable origin
        let _ = cors_layer(&["http://localhost:3000".to_string(), "\u{7f}bad".to_string()]);
    }
}
