//! Knowledge base and answer types shared across the pipeline stages.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of document content carried in vector
/// metadata. Counted in characters, not bytes, so multibyte text never
/// splits mid-character.
pub const METADATA_CONTENT_LIMIT: usize = 1000;

/// A knowledge base document as authored, before embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Document {
    /// The text fed to the embedding model for this document.
    pub fn embedding_text(&self) -> String {
        format!("{}. {}", self.title, self.content)
    }
}

/// Metadata stored alongside each vector. Content is truncated so the
/// metadata payload stays small; full documents live in the source file,
/// not the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub category: String,
    pub content: String,
    #[serde(default)]
    pub keywords: String,
}

impl DocumentMetadata {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            title: doc.title.clone(),
            category: doc.category.clone(),
            content: truncate_chars(&doc.content, METADATA_CONTENT_LIMIT),
            keywords: doc.keywords.join(", "),
        }
    }
}

/// Truncate to at most `max` characters, always on a character boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// One embedded record as held by a vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: DocumentMetadata,
}

/// A search hit: similarity score plus the stored metadata, flattened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedCandidate {
    pub id: String,
    pub score: f32,
    pub title: String,
    pub category: String,
    pub content: String,
}

impl RetrievedCandidate {
    pub fn from_metadata(id: String, score: f32, metadata: &DocumentMetadata) -> Self {
        Self {
            id,
            score,
            title: metadata.title.clone(),
            category: metadata.category.clone(),
            content: metadata.content.clone(),
        }
    }
}

/// A cited source in a shaped answer. At most three per answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub category: String,
}

/// A clickable follow-up action offered with an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub label: String,
    pub prompt: String,
}

impl Suggestion {
    pub fn new(id: &str, label: &str, prompt: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            prompt: prompt.to_string(),
        }
    }
}

/// The assistant's complete reply: answer text plus the interactive
/// affordances the host UI renders around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub suggestions: Vec<Suggestion>,
    pub follow_up: Option<String>,
}

/// Aggregate statistics for a vector index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vectors: usize,
    pub dimension: usize,
    pub fullness: f32,
}
