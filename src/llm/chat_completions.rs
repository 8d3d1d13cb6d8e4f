//! `OpenAI` Chat Completions API client.
//!
//! Sends one non-streaming request per user message to
//! `/v1/chat/completions` (or the provider's equivalent) and returns the
//! first choice's message content.

use anyhow::{Context, anyhow};
use uuid::Uuid;

use super::{Assistant, LlmSettings, Message};

/// Client for the `OpenAI` Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
    url: String,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("settings", &self.settings)
            .field("url", &self.url)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Create a new client with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self::with_client(settings, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    #[must_use]
    pub fn with_client(settings: LlmSettings, http: reqwest::Client) -> Self {
        let url = settings.provider.build_chat_url(&settings.base_url);
        Self {
            http,
            settings,
            url,
        }
    }

    /// URL completions are requested from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Conversation sent for a single user message.
    fn messages_for(&self, message: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.settings.system_prompt {
            messages.push(Message::system(prompt.as_str()));
        }
        messages.push(Message::user(message));
        messages
    }

    /// Run a completion over `messages` and return the reply text.
    pub async fn complete(&self, messages: Vec<Message>) -> anyhow::Result<String> {
        let request_id = Uuid::new_v4().to_string();

        tracing::debug!(
            request_id = %request_id,
            model = %self.settings.model,
            message_count = messages.len(),
            "Starting chat completion"
        );

        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
        });

        let mut rb = self.http.post(&self.url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = if self.settings.provider.uses_api_key_header() {
                rb.header("api-key", k)
            } else {
                rb.bearer_auth(k)
            };
        }

        let resp = rb.send().await.context("chat completion request failed")?;
        let status = resp.status();
        let v: serde_json::Value = resp
            .json()
            .await
            .context("chat completion response was not JSON")?;

        if !status.is_success() {
            let message = upstream_error_message(&v).unwrap_or_else(|| status.to_string());
            tracing::error!(
                request_id = %request_id,
                status = status.as_u16(),
                error = %message,
                "Chat completion rejected"
            );
            return Err(anyhow!(message));
        }

        let content = extract_content(&v)?;

        tracing::debug!(
            request_id = %request_id,
            content_length = content.len(),
            "Chat completion finished"
        );

        Ok(content)
    }
}

#[async_trait::async_trait]
impl Assistant for ChatCompletionsClient {
    async fn reply(&self, message: &str) -> anyhow::Result<String> {
        self.complete(self.messages_for(message)).await
    }
}

/// Pull `choices[0].message.content` out of a completion body.
fn extract_content(v: &serde_json::Value) -> anyhow::Result<String> {
    if let Some(message) = upstream_error_message(v) {
        return Err(anyhow!(message));
    }
    let message = &v["choices"][0]["message"];
    if message.is_null() {
        return Err(anyhow!("chat completion returned no choices"));
    }
    // A refusal or tool-only answer carries a null content.
    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string())
}

/// Error text from an `{"error": {"message": ...}}` or `{"error": "..."}` body.
fn upstream_error_message(v: &serde_json::Value) -> Option<String> {
    let err = v.get("error")?;
    err.get("message")
        .and_then(|m| m.as_str())
        .or_else(|| err.as_str())
        .map(ToString::to_string)
}
