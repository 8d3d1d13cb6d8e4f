//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use chat_widget::AppState;
use chat_widget::config::{AppConfig, ClientConfig, ServerConfig};
use chat_widget::llm::Assistant;

/// Assistant that echoes the message back and remembers what it saw.
#[derive(Default)]
pub struct EchoAssistant {
    pub seen: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Assistant for EchoAssistant {
    async fn reply(&self, message: &str) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(message.to_string());
        Ok(format!("echo: {message}"))
    }
}

/// Assistant that always fails.
pub struct FailingAssistant;

#[async_trait::async_trait]
impl Assistant for FailingAssistant {
    async fn reply(&self, _message: &str) -> anyhow::Result<String> {
        Err(anyhow!("upstream unavailable"))
    }
}

/// Assistant that never answers in time.
pub struct StalledAssistant;

#[async_trait::async_trait]
impl Assistant for StalledAssistant {
    async fn reply(&self, _message: &str) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Ok("too late".to_string())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            request_timeout_secs: 1,
            body_limit_bytes: 1024,
        },
        client: ClientConfig {
            base_url: "http://127.0.0.1:0".to_string(),
        },
    }
}

pub fn state_with(assistant: Arc<dyn Assistant>) -> AppState {
    AppState {
        assistant,
        config: Arc::new(test_config()),
    }
}

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub async fn spawn_app(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind loopback listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
