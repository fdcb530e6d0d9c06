//! Static suggestion and follow-up tables.
//!
//! All suggestion content is table-driven and deterministic. The shaper
//! combines these tables; nothing here calls a model.

use crate::types::Suggestion;

/// The generic follow-up used when a category has no specific entry.
pub const GENERIC_FOLLOW_UP: &str = "Is there anything else you'd like to know?";

/// Up to two suggestions keyed to a knowledge base category.
pub fn category_suggestions(category: &str) -> Vec<Suggestion> {
    match category {
        "Transportation" => vec![
            Suggestion::new(
                "bus_schedule",
                "📅 Bus Schedule",
                "What are the shuttle bus timings today?",
            ),
            Suggestion::new(
                "bus_routes",
                "🗺️ View Routes",
                "Show me all shuttle bus routes and stops",
            ),
        ],
        "Academic Programs" => vec![
            Suggestion::new(
                "program_requirements",
                "📚 Requirements",
                "What are the graduation requirements for my program?",
            ),
            Suggestion::new(
                "courses",
                "📖 Course List",
                "Show me available courses this semester",
            ),
        ],
        "Student Life" => vec![
            Suggestion::new(
                "events",
                "🎉 Campus Events",
                "What events are happening this week?",
            ),
            Suggestion::new(
                "clubs",
                "👥 Join Clubs",
                "Tell me about student clubs and organizations",
            ),
        ],
        "Housing" => vec![
            Suggestion::new(
                "housing_options",
                "🏠 Housing",
                "What housing options are available?",
            ),
            Suggestion::new(
                "housing_apply",
                "📝 Apply",
                "How do I apply for on-campus housing?",
            ),
        ],
        _ => Vec::new(),
    }
}

/// Generic suggestions used to pad an answer's suggestion list.
pub fn generic_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "contact_admin",
            "📞 Contact Admin",
            "How can I contact the administration office?",
        ),
        Suggestion::new(
            "portal_access",
            "🌐 Student Portal",
            "How do I access the student portal?",
        ),
        Suggestion::new(
            "library_hours",
            "📚 Library Hours",
            "What are the library opening hours?",
        ),
    ]
}

/// Suggestions offered with the insufficient-context fallback answer.
pub fn fallback_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "portal_search",
            "🔍 Search Portal",
            "Help me search the student portal",
        ),
        Suggestion::new(
            "contact_admin",
            "📞 Contact Admin",
            "How do I contact the administration?",
        ),
        Suggestion::new("general_info", "ℹ️ General Info", "Tell me about the campus"),
        Suggestion::new("programs", "🎓 Programs", "What programs does the university offer?"),
    ]
}

/// Suggestions offered with the degraded error answer.
pub fn error_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new("retry", "🔄 Try Again", "Let me try that question again"),
        Suggestion::new("help", "❓ Get Help", "How can I get technical support?"),
    ]
}

/// Follow-up question for a category. Unknown categories get the generic
/// prompt rather than nothing.
pub fn follow_up_for(category: &str) -> &'static str {
    match category {
        "Transportation" => "Would you like to know about weekend shuttle schedules?",
        "Academic Programs" => "Would you like to see the course curriculum details?",
        "Student Life" => "Want to know about upcoming student activities?",
        "Housing" => "Need help with the housing application process?",
        "Admissions" => "Would you like information about application deadlines?",
        _ => GENERIC_FOLLOW_UP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_have_two_suggestions() {
        for category in ["Transportation", "Academic Programs", "Student Life", "Housing"] {
            assert_eq!(category_suggestions(category).len(), 2, "{}", category);
        }
    }

    #[test]
    fn test_unknown_category_has_none() {
        assert!(category_suggestions("Cafeteria").is_empty());
    }

    #[test]
    fn test_transportation_table() {
        let suggestions = category_suggestions("Transportation");
        assert_eq!(suggestions[0].id, "bus_schedule");
        assert_eq!(suggestions[1].id, "bus_routes");
    }

    #[test]
    fn test_follow_up_falls_back_to_generic() {
        assert_eq!(
            follow_up_for("Housing"),
            "Need help with the housing application process?"
        );
        assert_eq!(follow_up_for("Cafeteria"), GENERIC_FOLLOW_UP);
    }

    #[test]
    fn test_padding_and_degraded_tables_are_nonempty() {
        assert_eq!(generic_suggestions().len(), 3);
        assert_eq!(fallback_suggestions().len(), 4);
        assert_eq!(error_suggestions().len(), 2);
    }
}
