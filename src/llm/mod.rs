//! Assistant backends for the chat endpoint.
//!
//! The [`Assistant`] trait is what the `/chat` handler talks to. The
//! production implementation, [`ChatCompletionsClient`], relays each message
//! to an OpenAI-compatible Chat Completions API as a single-turn conversation.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_widget::llm::{ChatCompletionsClient, LlmSettings, Provider};
//!
//! let settings = LlmSettings {
//!     base_url: "https://api.openai.com".to_string(),
//!     api_key: Some("sk-...".to_string()),
//!     model: "gpt-4o".to_string(),
//!     provider: Provider::OpenAI,
//!     system_prompt: None,
//! };
//! let client = ChatCompletionsClient::new(settings);
//! let reply = client.reply("Hello!").await?;
//! ```

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsClient;
pub use provider::Provider;

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gpt-4o`).
    pub model: String,
    /// Provider type (auto-detected from `base_url` if not specified).
    pub provider: Provider,
    /// Optional system prompt sent ahead of every user message.
    pub system_prompt: Option<String>,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text content.
    pub content: String,
}

impl Message {
    /// System prompt message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// Something that answers a single user message.
#[async_trait::async_trait]
pub trait Assistant: Send + Sync {
    /// Produce the assistant's reply to `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or rejects the request.
    async fn reply(&self, message: &str) -> anyhow::Result<String>;
}
