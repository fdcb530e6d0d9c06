//! Response shaping.
//!
//! Turns a raw model answer plus the retrieved candidates into the
//! structured reply the host renders. Shaping is a pure function of its
//! inputs: same answer and candidates, same result.

use std::collections::HashSet;

use crate::suggestions::{category_suggestions, follow_up_for, generic_suggestions};
use crate::types::{RetrievedCandidate, SourceRef, StructuredAnswer, Suggestion};

/// At most this many cited sources per answer.
pub const MAX_SOURCES: usize = 3;

/// At most this many suggestions per answer.
pub const MAX_SUGGESTIONS: usize = 5;

/// Snippet length in words.
pub const SNIPPET_MAX_WORDS: usize = 25;

/// Strategy for assembling the final answer.
pub trait ResponseShaper: Send + Sync {
    fn shape(
        &self,
        answer: &str,
        candidates: &[RetrievedCandidate],
        query: &str,
    ) -> StructuredAnswer;
}

/// First `SNIPPET_MAX_WORDS` words, with an ellipsis when truncated.
/// Splitting on whitespace keeps multibyte text intact.
pub fn snippet(content: &str, max_words: usize) -> String {
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.len() <= max_words {
        return content.to_string();
    }
    format!("{}...", words[..max_words].join(" "))
}

fn sources_from(candidates: &[RetrievedCandidate]) -> Vec<SourceRef> {
    candidates
        .iter()
        .take(MAX_SOURCES)
        .map(|candidate| SourceRef {
            id: candidate.id.clone(),
            title: candidate.title.clone(),
            snippet: snippet(&candidate.content, SNIPPET_MAX_WORDS),
            category: candidate.category.clone(),
        })
        .collect()
}

/// Full shaping: sources, category-driven suggestions padded with
/// generics, and a follow-up keyed to the top candidate's category.
pub struct StructuredShaper;

impl StructuredShaper {
    fn suggestions_from(candidates: &[RetrievedCandidate]) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = Vec::new();
        let mut seen_categories: HashSet<&str> = HashSet::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        // Categories contribute in the order candidates arrived (rank order),
        // not in hash or alphabetical order
        for candidate in candidates {
            if !seen_categories.insert(candidate.category.as_str()) {
                continue;
            }
            for suggestion in category_suggestions(&candidate.category) {
                if seen_ids.insert(suggestion.id.clone()) {
                    suggestions.push(suggestion);
                }
            }
        }

        for suggestion in generic_suggestions() {
            if suggestions.len() >= MAX_SUGGESTIONS {
                break;
            }
            if seen_ids.insert(suggestion.id.clone()) {
                suggestions.push(suggestion);
            }
        }

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }
}

impl ResponseShaper for StructuredShaper {
    fn shape(
        &self,
        answer: &str,
        candidates: &[RetrievedCandidate],
        _query: &str,
    ) -> StructuredAnswer {
        let follow_up = candidates
            .first()
            .map(|top| follow_up_for(&top.category).to_string());

        StructuredAnswer {
            answer: answer.to_string(),
            sources: sources_from(candidates),
            suggestions: Self::suggestions_from(candidates),
            follow_up,
        }
    }
}

/// Minimal shaping: answer and cited sources only. For hosts that render
/// their own affordances.
pub struct PlainShaper;

impl ResponseShaper for PlainShaper {
    fn shape(
        &self,
        answer: &str,
        candidates: &[RetrievedCandidate],
        _query: &str,
    ) -> StructuredAnswer {
        StructuredAnswer {
            answer: answer.to_string(),
            sources: sources_from(candidates),
            suggestions: Vec::new(),
            follow_up: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, category: &str, content: &str) -> RetrievedCandidate {
        RetrievedCandidate {
            id: id.to_string(),
            score: 0.9,
            title: format!("{} doc", id),
            category: category.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_snippet_truncates_long_content() {
        let content = (0..40).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let result = snippet(&content, SNIPPET_MAX_WORDS);
        assert_eq!(result.split_whitespace().count(), SNIPPET_MAX_WORDS);
        assert!(result.ends_with("..."));
        assert!(result.starts_with("w0 w1"));
    }

    #[test]
    fn test_snippet_keeps_short_content_unchanged() {
        let content = "only ten words are present in this short test sentence";
        assert_eq!(snippet(content, SNIPPET_MAX_WORDS), content);
        assert!(!snippet(content, SNIPPET_MAX_WORDS).ends_with("..."));
    }

    #[test]
    fn test_snippet_multibyte_safe() {
        let content = "métro départ horaire étudiants université ".repeat(10);
        let result = snippet(&content, SNIPPET_MAX_WORDS);
        assert_eq!(result.split_whitespace().count(), SNIPPET_MAX_WORDS);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_sources_capped_at_three() {
        let candidates: Vec<RetrievedCandidate> = (0..5)
            .map(|i| candidate(&format!("c{}", i), "General", "content"))
            .collect();
        let shaped = StructuredShaper.shape("answer", &candidates, "q");
        assert_eq!(shaped.sources.len(), MAX_SOURCES);
        assert_eq!(shaped.sources[0].id, "c0");
    }

    #[test]
    fn test_suggestions_capped_and_in_encounter_order() {
        // Four categories, two templates each: eight candidates for five slots
        let candidates = vec![
            candidate("a", "Housing", "content"),
            candidate("b", "Transportation", "content"),
            candidate("c", "Student Life", "content"),
            candidate("d", "Academic Programs", "content"),
        ];
        let shaped = StructuredShaper.shape("answer", &candidates, "q");

        assert_eq!(shaped.suggestions.len(), MAX_SUGGESTIONS);
        let ids: Vec<&str> = shaped.suggestions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["housing_options", "housing_apply", "bus_schedule", "bus_routes", "events"]
        );
    }

    #[test]
    fn test_duplicate_categories_contribute_once() {
        let candidates = vec![
            candidate("a", "Transportation", "content"),
            candidate("b", "Transportation", "content"),
        ];
        let shaped = StructuredShaper.shape("answer", &candidates, "q");
        let ids: Vec<&str> = shaped.suggestions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["bus_schedule", "bus_routes", "contact_admin", "portal_access", "library_hours"]
        );
    }

    #[test]
    fn test_no_duplicate_suggestion_ids() {
        let candidates = vec![
            candidate("a", "Housing", "content"),
            candidate("b", "Cafeteria", "content"),
        ];
        let shaped = StructuredShaper.shape("answer", &candidates, "q");
        let mut seen = HashSet::new();
        for suggestion in &shaped.suggestions {
            assert!(seen.insert(suggestion.id.clone()), "duplicate id {}", suggestion.id);
        }
    }

    #[test]
    fn test_follow_up_keyed_to_top_candidate() {
        let candidates = vec![
            candidate("a", "Transportation", "content"),
            candidate("b", "Housing", "content"),
        ];
        let shaped = StructuredShaper.shape("answer", &candidates, "q");
        assert_eq!(
            shaped.follow_up.as_deref(),
            Some("Would you like to know about weekend shuttle schedules?")
        );
    }

    #[test]
    fn test_unknown_category_gets_generic_follow_up() {
        let candidates = vec![candidate("a", "Cafeteria", "content")];
        let shaped = StructuredShaper.shape("answer", &candidates, "q");
        assert_eq!(
            shaped.follow_up.as_deref(),
            Some("Is there anything else you'd like to know?")
        );
    }

    #[test]
    fn test_plain_shaper_omits_affordances() {
        let candidates = vec![candidate("a", "Housing", "content")];
        let shaped = PlainShaper.shape("answer", &candidates, "q");
        assert_eq!(shaped.answer, "answer");
        assert_eq!(shaped.sources.len(), 1);
        assert!(shaped.suggestions.is_empty());
        assert!(shaped.follow_up.is_none());
    }
}
