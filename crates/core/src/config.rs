//! Configuration management for the campus assistant.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (campus.yaml)
//!
//! Provider credentials are validated up front: a missing API key must fail
//! at startup, before any pipeline is constructed, never mid-query.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// the pipeline, server, and CLI behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// OpenAI API key (completions and embeddings)
    pub openai_api_key: Option<String>,

    /// Completion model identifier
    pub openai_model: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding dimension. Every vector stored in or queried against the
    /// index must come from the same model at this dimension; mixing models
    /// silently corrupts similarity scores.
    pub dimension: usize,

    /// Pinecone API key
    pub pinecone_api_key: Option<String>,

    /// Pinecone serverless region
    pub pinecone_environment: String,

    /// Vector index name
    pub index_name: String,

    /// Number of candidates to retrieve per query
    pub top_k: usize,

    /// Minimum similarity score for a candidate to count as relevant.
    /// Tunable: observed deployments have run anywhere from 0.5 to 0.7.
    pub min_score: f32,

    /// Completion sampling temperature
    pub temperature: f32,

    /// Maximum completion tokens
    pub max_tokens: u32,

    /// Answer language ("en" or "fr")
    pub language: String,

    /// Origins allowed by the HTTP API's CORS layer
    pub allowed_origins: Vec<String>,

    /// HTTP server bind host
    pub host: String,

    /// HTTP server bind port
    pub port: u16,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    #[serde(skip)]
    pub verbose: bool,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    retrieval: Option<RetrievalSection>,
    generation: Option<GenerationSection>,
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct RetrievalSection {
    index_name: Option<String>,
    top_k: Option<usize>,
    min_score: Option<f32>,
    embedding_model: Option<String>,
    dimension: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerationSection {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            pinecone_api_key: None,
            pinecone_environment: "us-east-1".to_string(),
            index_name: "campus-assistant".to_string(),
            top_k: 5,
            min_score: 0.5,
            temperature: 0.3,
            max_tokens: 500,
            language: "en".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            host: "127.0.0.1".to_string(),
            port: 8001,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `OPENAI_API_KEY`: OpenAI credentials
    /// - `PINECONE_API_KEY`: Pinecone credentials
    /// - `PINECONE_ENVIRONMENT`: Pinecone region
    /// - `PINECONE_INDEX_NAME`: Index name
    /// - `CAMPUS_CONFIG`: Path to config file
    /// - `CAMPUS_MODEL`: Completion model
    /// - `CAMPUS_MIN_SCORE`: Relevance threshold
    /// - `CAMPUS_LANGUAGE`: Answer language
    /// - `CAMPUS_ALLOWED_ORIGINS`: Comma-separated CORS origins
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("CAMPUS_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("campus.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        config.pinecone_api_key = std::env::var("PINECONE_API_KEY").ok();

        if let Ok(environment) = std::env::var("PINECONE_ENVIRONMENT") {
            config.pinecone_environment = environment;
        }

        if let Ok(index_name) = std::env::var("PINECONE_INDEX_NAME") {
            config.index_name = index_name;
        }

        if let Ok(model) = std::env::var("CAMPUS_MODEL") {
            config.openai_model = model;
        }

        if let Ok(min_score) = std::env::var("CAMPUS_MIN_SCORE") {
            config.min_score = min_score.parse().map_err(|_| {
                AppError::Config(format!("CAMPUS_MIN_SCORE is not a number: {}", min_score))
            })?;
        }

        if let Ok(language) = std::env::var("CAMPUS_LANGUAGE") {
            config.language = language;
        }

        if let Ok(origins) = std::env::var("CAMPUS_ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!(path = %path.display(), "Merging configuration file");

        if let Some(retrieval) = config_file.retrieval {
            if let Some(index_name) = retrieval.index_name {
                self.index_name = index_name;
            }
            if let Some(top_k) = retrieval.top_k {
                self.top_k = top_k;
            }
            if let Some(min_score) = retrieval.min_score {
                self.min_score = min_score;
            }
            if let Some(embedding_model) = retrieval.embedding_model {
                self.embedding_model = embedding_model;
            }
            if let Some(dimension) = retrieval.dimension {
                self.dimension = dimension;
            }
        }

        if let Some(generation) = config_file.generation {
            if let Some(model) = generation.model {
                self.openai_model = model;
            }
            if let Some(temperature) = generation.temperature {
                self.temperature = temperature;
            }
            if let Some(max_tokens) = generation.max_tokens {
                self.max_tokens = max_tokens;
            }
            if let Some(language) = generation.language {
                self.language = language;
            }
        }

        if let Some(server) = config_file.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
            if let Some(allowed_origins) = server.allowed_origins {
                self.allowed_origins = allowed_origins;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        model: Option<String>,
        language: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(model) = model {
            self.openai_model = model;
        }

        if let Some(language) = language {
            self.language = language;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate that required credentials are present.
    ///
    /// Reports every missing credential at once so operators fix the
    /// environment in one pass. Must be called before any provider client
    /// or pipeline is constructed.
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();

        if self.openai_api_key.as_deref().unwrap_or("").is_empty() {
            missing.push("OPENAI_API_KEY");
        }
        if self.pinecone_api_key.as_deref().unwrap_or("").is_empty() {
            missing.push("PINECONE_API_KEY");
        }

        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        if !(self.min_score >= -1.0 && self.min_score <= 1.0) {
            return Err(AppError::Config(format!(
                "min_score must be within [-1.0, 1.0], got {}",
                self.min_score
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }

        tracing::debug!(
            model = %self.openai_model,
            embedding_model = %self.embedding_model,
            index = %self.index_name,
            top_k = self.top_k,
            min_score = self.min_score,
            "Configuration validated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.dimension, 1536);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.min_score, 0.5);
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_validate_reports_all_missing_keys() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("OPENAI_API_KEY"));
        assert!(text.contains("PINECONE_API_KEY"));
    }

    #[test]
    fn test_validate_with_keys() {
        let mut config = AppConfig::default();
        config.openai_api_key = Some("sk-test".to_string());
        config.pinecone_api_key = Some("pc-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = AppConfig::default();
        config.openai_api_key = Some("sk-test".to_string());
        config.pinecone_api_key = Some("pc-test".to_string());
        config.min_score = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            Some("gpt-4-turbo-preview".to_string()),
            Some("fr".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.openai_model, "gpt-4-turbo-preview");
        assert_eq!(overridden.language, "fr");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }
}
