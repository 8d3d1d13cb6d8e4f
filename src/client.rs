//! HTTP transport between the widget and the chat endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::{CHAT_PATH, ChatReply, ChatRequest};

/// Anything that can carry a [`ChatRequest`] to the chat endpoint and bring
/// back its decoded [`ChatReply`].
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one chat request and decode the reply body.
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        (**self).post_chat(request).await
    }
}

/// reqwest-backed transport for `POST /chat`.
///
/// # Example
///
/// ```rust,no_run
/// use chat_widget::client::{ChatTransport, HttpTransport};
/// use chat_widget::protocol::ChatRequest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new("http://localhost:5000")?;
/// let reply = transport.post_chat(&ChatRequest::new("Hello!")).await?;
/// println!("{}", reply.assistant_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(Error::Config(format!("unsupported URL scheme: {other}"))),
        }
        let endpoint = base_url.join(CHAT_PATH)?;
        Ok(Self { endpoint, http })
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        // The status code is not consulted; the body decides what is shown.
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(
            status = status.as_u16(),
            body_length = body.len(),
            "Chat endpoint responded"
        );

        Ok(serde_json::from_slice(&body)?)
    }
}
