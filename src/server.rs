use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::llm::{Assistant, ChatCompletionsClient, LlmSettings};
use crate::protocol::{CHAT_PATH, ChatReply, ChatRequest};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        provider = ?settings.provider,
        "LLM configuration loaded"
    );
    if settings.api_key.is_none() {
        tracing::warn!("No LLM API key configured; upstream requests may be rejected");
    }

    let assistant: Arc<dyn Assistant> = Arc::new(ChatCompletionsClient::new(settings));
    let state = AppState {
        assistant,
        config: Arc::clone(&config),
    };

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout_duration = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route(CHAT_PATH, post(chat))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /chat - Answer a single message.
///
/// Failures are reported in the body as `{"error": ...}` with a 200 status.
async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatReply> {
    let message = req.message.trim();
    if message.is_empty() {
        tracing::debug!("Rejected empty chat message");
        return Json(ChatReply::error("message must not be empty"));
    }

    tracing::info!(message_length = message.len(), "Received chat request");

    match state.assistant.reply(message).await {
        Ok(reply) => {
            tracing::info!(reply_length = reply.len(), "Chat reply ready");
            Json(ChatReply::reply(reply))
        }
        Err(e) => {
            tracing::error!(error = %e, "Assistant failed to reply");
            Json(ChatReply::error(format!("{e:#}")))
        }
    }
}

/// GET /health - Liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
