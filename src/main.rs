//! Chat widget server and terminal client.
//!
//! `chat-widget serve` exposes the `/chat` endpoint; `chat-widget chat`
//! mounts the widget on the terminal and talks to a running server.

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::map_err_ignore)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::rc::Rc;
use std::sync::Arc;

use chat_widget::client::HttpTransport;
use chat_widget::config::{AppConfig, Cli, Command, load_llm_settings};
use chat_widget::server::start_server;
use chat_widget::widget::{ChatWidget, InputBuffer, LineTrigger, WidgetParts, WriterLog};
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Serve);

    // Stdout is the log surface in chat mode, so diagnostics go to stderr.
    let default_level = match command {
        Command::Serve => "info",
        Command::Chat { .. } => "warn",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = match AppConfig::from_cli(&cli) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let result = match command {
        Command::Serve => {
            let settings = match load_llm_settings() {
                Ok(s) => s,
                Err(msg) => {
                    eprintln!("Configuration error: {msg}");
                    std::process::exit(1);
                }
            };
            start_server(config, settings).await
        }
        Command::Chat { .. } => run_chat(&config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Exiting after fatal error");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Mount the widget on stdin/stdout and run it until stdin closes.
async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.client.base_url)?;
    let endpoint = transport.endpoint().clone();

    let input = Rc::new(InputBuffer::default());
    let parts = WidgetParts {
        trigger: Some(LineTrigger::stdin(Rc::clone(&input))),
        input: Some(input),
        log: Some(WriterLog::stdout()),
    };

    let Some(wired) = ChatWidget::mount(parts, transport) else {
        return Ok(());
    };

    info!(
        name: "widget.mounted",
        endpoint = %endpoint,
        "Chat widget ready"
    );

    let report = wired.run().await;

    info!(
        rendered = report.rendered,
        failed = report.failed,
        skipped = report.skipped,
        "Chat session ended"
    );
    Ok(())
}
