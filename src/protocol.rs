//! Wire types for the `/chat` endpoint.
//!
//! The widget and the server share these shapes:
//!
//! - request: `{"message": "<trimmed user text>"}`
//! - response: `{"reply": "<assistant text>"}` or `{"error": "<error text>"}`

use serde::{Deserialize, Serialize};

/// Path of the chat endpoint, relative to the server root.
pub const CHAT_PATH: &str = "/chat";

/// Request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message content.
    pub message: String,
}

impl ChatRequest {
    /// Create a request for the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body from `POST /chat`.
///
/// Either field may be missing; a body carrying neither still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant reply on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    /// Successful reply.
    #[must_use]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            error: None,
        }
    }

    /// Failed reply.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            reply: None,
            error: Some(text.into()),
        }
    }

    /// Text shown on the assistant line: the reply if non-empty, else the
    /// error if non-empty, else nothing.
    #[must_use]
    pub fn assistant_text(&self) -> &str {
        self.reply
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.error.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or_default()
    }
}
