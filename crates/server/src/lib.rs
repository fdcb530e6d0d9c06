//! HTTP API for the campus assistant.
//!
//! A thin axum layer over [`campus_rag::RagPipeline`]: the pipeline is
//! constructed once at startup and shared through [`AppState`]. Handlers
//! translate between JSON and the pipeline; no assistant logic lives here.

pub mod server;

pub use server::{app_router, run_server, AppState, ChatRequestBody, IndexResponseBody};
