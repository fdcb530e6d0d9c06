//! Completion-model integration for the campus assistant.
//!
//! This crate provides a provider-agnostic abstraction for chat-completion
//! models. The pipeline depends only on the [`ChatClient`] trait; the
//! concrete provider is chosen at startup through [`create_client`].
//!
//! # Example
//! ```no_run
//! use campus_llm::{ChatClient, ChatMessage, ChatRequest, providers::OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...")?;
//! let request = ChatRequest::new("gpt-4o-mini")
//!     .with_message(ChatMessage::system("You are a campus assistant."))
//!     .with_message(ChatMessage::user("When does the library open?"));
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatClient, ChatMessage, ChatRequest, ChatResponse, ChatUsage, Role};
pub use factory::create_client;
pub use providers::OpenAiClient;
