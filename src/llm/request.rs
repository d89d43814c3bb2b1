//! Chat-completion request payload

use super::config::GenerationConfig;
use super::prompt::PromptContext;
use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// JSON body of a chat-completion request
///
/// ```rust
/// use tmdl_er_sdk::llm::{ChatRequest, GenerationConfig, PromptContext};
///
/// let prompt = PromptContext::new("You document reports.", "Document this one.");
/// let request = ChatRequest::new(&prompt, &GenerationConfig::default());
/// let body = serde_json::to_value(&request).unwrap();
///
/// assert_eq!(body["messages"][0]["role"], "system");
/// assert_eq!(body["max_tokens"], 2000);
/// assert_eq!(body["stream_options"]["include_usage"], true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

impl ChatRequest {
    /// System and user message from `prompt`, sampling parameters from `config`
    ///
    /// `stream_options` is only sent for streamed requests.
    pub fn new(prompt: &PromptContext, config: &GenerationConfig) -> Self {
        Self {
            messages: vec![
                ChatMessage::new(Role::System, &prompt.system_prompt),
                ChatMessage::new(Role::User, &prompt.user_prompt),
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
            stream: config.stream,
            stream_options: config.stream.then_some(StreamOptions {
                include_usage: config.include_usage,
            }),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
