//! Prompt assembly for the campus assistant.
//!
//! Turns a user question, retrieved context documents, and a bounded window
//! of recent conversation turns into the system/user prompts sent to the
//! completion model. The system prompt carries the strict context-only
//! instruction and the literal refusal phrase other components key off of.

pub mod builder;
pub mod types;

pub use builder::{build_prompt, MAX_CONTEXT_DOCUMENTS, MAX_HISTORY_TURNS};
pub use types::{BuiltPrompt, ChatTurn, ContextDocument, Language, TurnRole};
