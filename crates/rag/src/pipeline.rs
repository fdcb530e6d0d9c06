//! The RAG pipeline orchestrator.
//!
//! One entry point, `query`, with a total interface: a blank question is
//! the only way to get an `Err` back. Insufficient grounding produces the
//! fallback answer without touching the completion model; provider and
//! storage failures degrade into the canned error answer. The host always
//! has something to render.

use std::sync::Arc;

use campus_core::{AppConfig, AppError, AppResult};
use campus_llm::{ChatClient, ChatMessage, ChatRequest};
use campus_prompt::{build_prompt, ChatTurn, ContextDocument, Language, TurnRole};

use crate::embeddings::EmbeddingProvider;
use crate::retriever::Retriever;
use crate::shaper::{ResponseShaper, StructuredShaper};
use crate::suggestions::{error_suggestions, fallback_suggestions};
use crate::types::StructuredAnswer;
use crate::vector_index::VectorIndex;

/// Pipeline tuning knobs, a snapshot of the relevant [`AppConfig`] fields.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub top_k: usize,
    pub min_score: f32,
    pub language: Language,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.5,
            language: Language::En,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 500,
        }
    }
}

impl PipelineConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            top_k: config.top_k,
            min_score: config.min_score,
            language: Language::parse(&config.language),
            model: config.openai_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// The canned answer when retrieval finds no sufficiently relevant
/// context. No model call is involved; the text is fixed per language.
pub fn fallback_answer(language: Language) -> StructuredAnswer {
    let answer = match language {
        Language::En => {
            "I don't have verified information about that right now. You can try \
             rephrasing your question, or ask me about programs, housing, \
             transportation, or student life."
        }
        Language::Fr => {
            "Je n'ai pas d'information vérifiée à ce sujet pour le moment. Vous pouvez \
             reformuler votre question, ou me demander des informations sur les \
             programmes, le logement, les transports ou la vie étudiante."
        }
    };
    let follow_up = match language {
        Language::En => "What would you like to know about the campus?",
        Language::Fr => "Que souhaitez-vous savoir sur le campus ?",
    };

    StructuredAnswer {
        answer: answer.to_string(),
        sources: Vec::new(),
        suggestions: fallback_suggestions(),
        follow_up: Some(follow_up.to_string()),
    }
}

/// The canned answer when a provider or the index fails mid-query.
pub fn error_answer(language: Language) -> StructuredAnswer {
    let answer = match language {
        Language::En => {
            "I'm having trouble processing your request right now. Please try again \
             in a moment."
        }
        Language::Fr => {
            "J'ai des difficultés à traiter votre demande pour le moment. Veuillez \
             réessayer dans un instant."
        }
    };

    StructuredAnswer {
        answer: answer.to_string(),
        sources: Vec::new(),
        suggestions: error_suggestions(),
        follow_up: None,
    }
}

/// The assembled pipeline. Construct once at startup via
/// [`RagPipelineBuilder`] and share behind an `Arc`.
pub struct RagPipeline {
    config: PipelineConfig,
    retriever: Retriever,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn ChatClient>,
    shaper: Arc<dyn ResponseShaper>,
}

impl RagPipeline {
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn vector_index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Answer a question, optionally continuing a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Input`] if `text` is blank. Every other failure
    /// is absorbed into a degraded [`StructuredAnswer`].
    pub async fn query(&self, text: &str, history: &[ChatTurn]) -> AppResult<StructuredAnswer> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Input("question must not be empty".to_string()));
        }

        let language = self.config.language;

        let candidates = match self
            .retriever
            .retrieve(text, self.config.top_k, self.config.min_score)
            .await
        {
            Ok(candidates) => candidates,
            Err(error) => {
                tracing::error!(%error, "Retrieval failed; returning degraded answer");
                return Ok(error_answer(language));
            }
        };

        if candidates.is_empty() {
            tracing::info!("No candidate passed the relevance gate; returning fallback");
            return Ok(fallback_answer(language));
        }

        let documents: Vec<ContextDocument> = candidates
            .iter()
            .take(3)
            .map(|candidate| ContextDocument {
                title: candidate.title.clone(),
                category: candidate.category.clone(),
                content: candidate.content.clone(),
            })
            .collect();

        let prompt = build_prompt(text, &documents, language, history)?;

        let mut request = ChatRequest::new(&self.config.model)
            .with_message(ChatMessage::system(prompt.system))
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);
        for turn in &prompt.history {
            request = request.with_message(match turn.role {
                TurnRole::User => ChatMessage::user(&turn.content),
                TurnRole::Assistant => ChatMessage::assistant(&turn.content),
            });
        }
        request = request.with_message(ChatMessage::user(prompt.user));

        let answer = match self.generator.complete(&request).await {
            Ok(response) => response.content,
            Err(error) => {
                tracing::error!(%error, "Completion failed; returning degraded answer");
                return Ok(error_answer(language));
            }
        };

        Ok(self.shaper.shape(&answer, &candidates, text))
    }
}

/// Builder wiring the pipeline's components together.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<PipelineConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    generator: Option<Arc<dyn ChatClient>>,
    shaper: Option<Arc<dyn ResponseShaper>>,
}

impl RagPipelineBuilder {
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn ChatClient>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override the response shaping strategy. Defaults to
    /// [`StructuredShaper`].
    pub fn with_shaper(mut self, shaper: Arc<dyn ResponseShaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    pub fn build(self) -> AppResult<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| AppError::Config("pipeline requires an embedding provider".to_string()))?;
        let index = self
            .index
            .ok_or_else(|| AppError::Config("pipeline requires a vector index".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| AppError::Config("pipeline requires a chat client".to_string()))?;
        let shaper = self.shaper.unwrap_or_else(|| Arc::new(StructuredShaper));

        let retriever = Retriever::new(Arc::clone(&embedder), Arc::clone(&index));

        Ok(RagPipeline {
            config,
            retriever,
            embedder,
            index,
            generator,
            shaper,
        })
    }
}
