//! Documentation generation requests
//!
//! Builds the prompts and the chat-completion request body used to document
//! a report. Sending the request is left to the caller; the streamed response
//! is decoded with [`crate::stream`].

pub mod config;
pub mod prompt;
pub mod request;

pub use config::GenerationConfig;
pub use prompt::{estimate_tokens, PromptContext};
pub use request::{ChatMessage, ChatRequest, Role, StreamOptions};
