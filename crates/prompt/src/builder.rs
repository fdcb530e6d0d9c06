//! Prompt builder.
//!
//! Assembles the grounding context and system/user prompts from retrieved
//! documents. The orchestrator is responsible for never calling this with an
//! empty candidate list (it should have short-circuited to the fallback
//! answer already), so an empty list here fails loudly as a programmer
//! error instead of producing a silent empty-context prompt.

use campus_core::{AppError, AppResult};

use crate::types::{BuiltPrompt, ChatTurn, ContextDocument, Language};

/// Maximum number of context documents included in a prompt.
pub const MAX_CONTEXT_DOCUMENTS: usize = 5;

/// Maximum number of prior conversation turns included in a prompt.
/// Older turns are silently dropped, never summarized.
pub const MAX_HISTORY_TURNS: usize = 6;

/// Build the system/user prompts for a grounded answer.
///
/// Context documents are concatenated as `"[category] title:\ncontent"`
/// blocks, blank-line separated, in the order received (the retriever has
/// already rank-sorted them; this function must not re-sort).
///
/// # Errors
///
/// Returns [`AppError::Input`] if `documents` is empty.
pub fn build_prompt(
    query: &str,
    documents: &[ContextDocument],
    language: Language,
    history: &[ChatTurn],
) -> AppResult<BuiltPrompt> {
    if documents.is_empty() {
        return Err(AppError::Input(
            "prompt requested with no context documents; the caller should have \
             produced a fallback answer instead"
                .to_string(),
        ));
    }

    let context = build_context(&documents[..documents.len().min(MAX_CONTEXT_DOCUMENTS)]);
    let system = build_system_prompt(&context, language);

    // Only the last N turns survive; a longer transcript is the host's
    // problem, not the prompt's.
    let window_start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let history: Vec<ChatTurn> = history[window_start..].to_vec();

    tracing::debug!(
        document_count = documents.len().min(MAX_CONTEXT_DOCUMENTS),
        history_turns = history.len(),
        language = language.as_str(),
        "built prompt"
    );

    Ok(BuiltPrompt {
        system,
        user: query.to_string(),
        history,
    })
}

/// Concatenate context documents into the grounding block.
fn build_context(documents: &[ContextDocument]) -> String {
    documents
        .iter()
        .map(|doc| format!("[{}] {}:\n{}", doc.category, doc.title, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the strict system prompt for grounded answering.
fn build_system_prompt(context: &str, language: Language) -> String {
    let rules = match language {
        Language::En => format!(
            "You are the campus assistant. Follow these STRICT rules:\n\n\
             1. Answer ONLY using the context provided below. No hallucination allowed.\n\
             2. If the context is insufficient, say exactly: \"{}\"\n\
             3. Be concise: 1-5 short paragraphs or bullet points.\n\
             4. Be factual and accurate.\n\
             5. Be friendly and student-focused.\n\
             6. {}",
            language.refusal_phrase(),
            language.response_language_rule()
        ),
        Language::Fr => format!(
            "Vous êtes l'assistant du campus. Suivez ces règles STRICTES :\n\n\
             1. Répondez UNIQUEMENT en utilisant le contexte fourni ci-dessous. Aucune invention autorisée.\n\
             2. Si le contexte est insuffisant, dites exactement : \"{}\"\n\
             3. Soyez concis : 1 à 5 courts paragraphes ou listes à puces.\n\
             4. Soyez factuel et précis.\n\
             5. Soyez chaleureux et à l'écoute des étudiants.\n\
             6. {}",
            language.refusal_phrase(),
            language.response_language_rule()
        ),
    };

    format!(
        "{}\n\nContext:\n{}\n\nRespond with ONLY the answer text. Do not add any extra formatting or metadata.",
        rules, context
    )
}
