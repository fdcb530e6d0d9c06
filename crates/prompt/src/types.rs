//! Prompt types and the language table.

use serde::{Deserialize, Serialize};

/// Answer language.
///
/// The refusal phrase is a contract surface: the system prompt instructs the
/// model to emit it verbatim when context is insufficient, and the fallback
/// answer reuses the same wording. Keep the table literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    /// Parse a language code. Unknown codes fall back to English.
    pub fn parse(code: &str) -> Self {
        match code.to_lowercase().as_str() {
            "fr" => Self::Fr,
            _ => Self::En,
        }
    }

    /// Canonical language code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// The exact refusal phrase the model must use when the supplied
    /// context does not contain the answer.
    pub fn refusal_phrase(&self) -> &'static str {
        match self {
            Self::En => "I don't have that information in my knowledge base.",
            Self::Fr => "Je n'ai pas cette information dans ma base de connaissances.",
        }
    }

    /// Instruction pinning the response language.
    pub fn response_language_rule(&self) -> &'static str {
        match self {
            Self::En => "Always respond in English.",
            Self::Fr => "Répondez toujours en français.",
        }
    }
}

/// A context document supplied to the prompt, already rank-sorted by the
/// retriever. The builder must not re-sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDocument {
    pub title: String,
    pub category: String,
    pub content: String,
}

/// Role of a prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A prior conversation turn handed in by the host. The core holds no
/// session state; this is plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// An assembled prompt ready for the completion model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System prompt: rules, refusal phrase, grounding context
    pub system: String,

    /// User prompt: the question itself
    pub user: String,

    /// Recent history turns, already bounded to the window size,
    /// oldest first. Placed between system and user messages.
    pub history: Vec<ChatTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("en"), Language::En);
        assert_eq!(Language::parse("fr"), Language::Fr);
        assert_eq!(Language::parse("FR"), Language::Fr);
        // Unknown codes default to English rather than failing a query
        assert_eq!(Language::parse("rw"), Language::En);
    }

    #[test]
    fn test_refusal_phrases_are_fixed() {
        assert_eq!(
            Language::En.refusal_phrase(),
            "I don't have that information in my knowledge base."
        );
        assert_eq!(
            Language::Fr.refusal_phrase(),
            "Je n'ai pas cette information dans ma base de connaissances."
        );
    }
}
