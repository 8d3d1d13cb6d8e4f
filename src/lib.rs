//! Chat widget and the `/chat` endpoint it talks to.
//!
//! A widget reads a text input, posts the trimmed message to `/chat`, and
//! appends the `You` / `Assistant` pair to a log surface once the reply
//! arrives. The server answers each message through an OpenAI-compatible
//! Chat Completions API.
//!
//! # Architecture
//!
//! - **Widget**: surface traits, the submit cycle and the trigger loop
//! - **Transport**: reqwest client for `POST /chat`
//! - **Server**: Axum router exposing `POST /chat` and `GET /health`
//! - **Assistant**: single-turn Chat Completions client
//!
//! # Modules
//!
//! - [`widget`]: the chat widget and its surfaces
//! - [`client`]: transport between widget and server
//! - [`protocol`]: wire types shared by both sides
//! - [`render`]: log entry rendering
//! - [`llm`]: assistant backends
//! - [`server`]: HTTP server

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::map_err_ignore)]

pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod protocol;
pub mod render;
pub mod server;
pub mod widget;

use crate::config::AppConfig;

use llm::Assistant;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backend answering chat messages.
    pub assistant: Arc<dyn Assistant>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}
