//! The chat widget.
//!
//! On each trigger activation the widget reads the text input, sends the
//! trimmed message to the chat endpoint, and appends a `You` / `Assistant`
//! pair to the log surface once the reply arrives.
//!
//! # Overview
//!
//! Hosts look up three handles (see [`surface`]) and pass them to
//! [`ChatWidget::mount`]. If any handle is missing the widget stays inert.
//!
//! ```rust,ignore
//! let parts = WidgetParts {
//!     trigger: Some(LineTrigger::stdin(Rc::clone(&input))),
//!     input: Some(input),
//!     log: Some(WriterLog::stdout()),
//! };
//! if let Some(wired) = ChatWidget::mount(parts, HttpTransport::new(url)?) {
//!     wired.run().await;
//! }
//! ```
//!
//! # Failure
//!
//! A failed request leaves the log and the input untouched. [`ChatWidget::submit`]
//! reports it as an [`Error`](crate::error::Error); [`Wired::run`] logs it and
//! keeps going.

pub mod memory;
pub mod surface;
pub mod terminal;

pub use memory::{InputBuffer, RecordingLog};
pub use surface::{LogSurface, TextInput, Trigger};
pub use terminal::{LineTrigger, WriterLog};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use uuid::Uuid;

use crate::client::ChatTransport;
use crate::error::Result;
use crate::protocol::{ChatReply, ChatRequest};
use crate::render::LogEntry;

/// Handles found by the host, each possibly absent.
#[derive(Debug)]
pub struct WidgetParts<T, I, L> {
    /// Send trigger (`chat-btn`).
    pub trigger: Option<T>,
    /// Text input (`chat-input`).
    pub input: Option<I>,
    /// Log surface (`chat-box`).
    pub log: Option<L>,
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input was blank; nothing was sent.
    Skipped,
    /// A round trip completed and both entries were appended.
    Rendered {
        /// Trimmed message that was sent.
        message: String,
        /// Decoded reply body.
        reply: ChatReply,
    },
}

/// Counts collected by [`Wired::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Activations with blank input.
    pub skipped: usize,
    /// Round trips that rendered.
    pub rendered: usize,
    /// Requests that failed.
    pub failed: usize,
}

/// Chat widget bound to an input, a log surface and a transport.
#[derive(Debug)]
pub struct ChatWidget<I, L, C> {
    input: I,
    log: L,
    transport: C,
}

impl<I, L, C> ChatWidget<I, L, C>
where
    I: TextInput,
    L: LogSurface,
    C: ChatTransport,
{
    /// Create a widget from handles that are known to exist.
    pub fn new(input: I, log: L, transport: C) -> Self {
        Self {
            input,
            log,
            transport,
        }
    }

    /// Wire the widget if all three handles are present.
    ///
    /// Returns `None` when any handle is missing; no error is raised.
    pub fn mount<T: Trigger>(parts: WidgetParts<T, I, L>, transport: C) -> Option<Wired<T, I, L, C>> {
        let (Some(trigger), Some(input), Some(log)) = (parts.trigger, parts.input, parts.log)
        else {
            tracing::debug!(
                trigger = surface::TRIGGER_ID,
                input = surface::INPUT_ID,
                log = surface::LOG_ID,
                "Chat widget handles missing, staying inert"
            );
            return None;
        };

        Some(Wired {
            trigger,
            widget: Self::new(input, log, transport),
        })
    }

    /// Read and trim the input value.
    ///
    /// Returns `None` when the trimmed value is empty.
    pub fn prepare(&self) -> Option<String> {
        let value = self.input.value();
        let message = value.trim();
        (!message.is_empty()).then(|| message.to_string())
    }

    /// Send an already prepared message and render the round trip.
    pub async fn send(&self, message: String) -> Result<SubmitOutcome> {
        let request_id = Uuid::new_v4();
        let request = ChatRequest::new(message);

        tracing::debug!(
            request_id = %request_id,
            message_length = request.message.len(),
            "Sending chat message"
        );

        let reply = self.transport.post_chat(&request).await?;

        self.log.append(&LogEntry::you(request.message.as_str()));
        self.log.append(&LogEntry::assistant(reply.assistant_text()));
        self.log.scroll_to_bottom();
        self.input.set_value("");

        tracing::debug!(
            request_id = %request_id,
            has_reply = reply.reply.is_some(),
            has_error = reply.error.is_some(),
            "Chat round trip rendered"
        );

        Ok(SubmitOutcome::Rendered {
            message: request.message,
            reply,
        })
    }

    /// Submit the current input value.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        match self.prepare() {
            Some(message) => self.send(message).await,
            None => Ok(SubmitOutcome::Skipped),
        }
    }

    /// The text input handle.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// The log surface handle.
    pub fn log(&self) -> &L {
        &self.log
    }
}

/// A widget whose handles were all found, together with its trigger.
#[derive(Debug)]
pub struct Wired<T, I, L, C> {
    trigger: T,
    widget: ChatWidget<I, L, C>,
}

impl<T, I, L, C> Wired<T, I, L, C>
where
    T: Trigger,
    I: TextInput,
    L: LogSurface,
    C: ChatTransport,
{
    /// The wired widget.
    pub fn widget(&self) -> &ChatWidget<I, L, C> {
        &self.widget
    }

    /// Handle activations until the trigger closes.
    ///
    /// Requests overlap freely: a new activation does not wait for earlier
    /// replies, and entries are appended in the order replies arrive. Requests
    /// still in flight when the trigger closes are awaited before returning.
    pub async fn run(self) -> RunReport {
        let Self {
            mut trigger,
            widget,
        } = self;
        let mut report = RunReport::default();
        let mut in_flight = FuturesUnordered::new();

        loop {
            tokio::select! {
                fired = trigger.activated() => {
                    if !fired {
                        break;
                    }
                    match widget.prepare() {
                        Some(message) => in_flight.push(widget.send(message)),
                        None => report.skipped += 1,
                    }
                }
                Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                    record(&mut report, result);
                }
            }
        }

        while let Some(result) = in_flight.next().await {
            record(&mut report, result);
        }

        tracing::debug!(
            rendered = report.rendered,
            failed = report.failed,
            skipped = report.skipped,
            "Chat widget trigger closed"
        );
        report
    }
}

fn record(report: &mut RunReport, result: Result<SubmitOutcome>) {
    match result {
        Ok(SubmitOutcome::Rendered { .. }) => report.rendered += 1,
        Ok(SubmitOutcome::Skipped) => report.skipped += 1,
        Err(e) => {
            report.failed += 1;
            tracing::warn!(error = %e, "Chat request failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::error::Error;

    /// Transport answering every request with the same reply, recording requests.
    struct CannedTransport {
        reply: ChatReply,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl CannedTransport {
        fn new(reply: ChatReply) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for CannedTransport {
        async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    /// Transport that answers `re <message>` after a delay chosen per message.
    struct DelayedTransport;

    #[async_trait]
    impl ChatTransport for DelayedTransport {
        async fn post_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
            let delay = if request.message == "slow" { 500 } else { 10 };
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            Ok(ChatReply::reply(format!("re {}", request.message)))
        }
    }

    struct BrokenTransport;

    #[async_trait]
    impl ChatTransport for BrokenTransport {
        async fn post_chat(&self, _request: &ChatRequest) -> Result<ChatReply> {
            Err(Error::Json(
                serde_json::from_str::<ChatReply>("not json").unwrap_err(),
            ))
        }
    }

    fn widget_with<C: ChatTransport>(
        value: &str,
        transport: C,
    ) -> (Rc<InputBuffer>, Rc<RecordingLog>, ChatWidget<Rc<InputBuffer>, Rc<RecordingLog>, C>) {
        let input = Rc::new(InputBuffer::new(value));
        let log = Rc::new(RecordingLog::new());
        let widget = ChatWidget::new(Rc::clone(&input), Rc::clone(&log), transport);
        (input, log, widget)
    }

    #[tokio::test]
    async fn test_whitespace_input_sends_nothing() {
        let transport = Arc::new(CannedTransport::new(ChatReply::reply("hi")));
        for value in ["", "   ", "\t\n "] {
            let (input, log, widget) = widget_with(value, Arc::clone(&transport));
            let outcome = widget.submit().await.unwrap();
            assert_eq!(outcome, SubmitOutcome::Skipped);
            assert!(log.entries().is_empty());
            assert_eq!(input.value(), value);
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_sends_trimmed_message_once() {
        let transport = Arc::new(CannedTransport::new(ChatReply::reply("hi")));
        let (_input, _log, widget) = widget_with("  hello  ", Arc::clone(&transport));

        widget.submit().await.unwrap();

        assert_eq!(transport.requests(), vec![ChatRequest::new("hello")]);
    }

    #[tokio::test]
    async fn test_reply_renders_pair_in_order() {
        let (input, log, widget) = widget_with("hello", CannedTransport::new(ChatReply::reply("hi")));

        let outcome = widget.submit().await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Rendered {
                message: "hello".to_string(),
                reply: ChatReply::reply("hi"),
            }
        );
        assert_eq!(log.lines(), vec!["You: hello", "Assistant: hi"]);
        assert_eq!(input.value(), "");
        assert_eq!(log.scroll_top(), log.scroll_height());
    }

    #[tokio::test]
    async fn test_error_renders_on_assistant_line() {
        let (_input, log, widget) =
            widget_with("hello", CannedTransport::new(ChatReply::error("rate limited")));

        widget.submit().await.unwrap();

        assert_eq!(log.lines(), vec!["You: hello", "Assistant: rate limited"]);
    }

    #[tokio::test]
    async fn test_empty_reply_renders_blank_line() {
        let (_input, log, widget) = widget_with("hello", CannedTransport::new(ChatReply::default()));

        widget.submit().await.unwrap();

        assert_eq!(log.lines(), vec!["You: hello", "Assistant: "]);
    }

    #[tokio::test]
    async fn test_failure_leaves_log_and_input_alone() {
        let (input, log, widget) = widget_with("hello", BrokenTransport);

        let result = widget.submit().await;

        assert!(matches!(result, Err(Error::Json(_))));
        assert!(log.entries().is_empty());
        assert_eq!(log.scroll_top(), 0);
        assert_eq!(input.value(), "hello");
    }

    #[tokio::test]
    async fn test_log_is_append_only_across_submissions() {
        let (input, log, widget) = widget_with("one", CannedTransport::new(ChatReply::reply("ok")));

        widget.submit().await.unwrap();
        input.set_value("two");
        widget.submit().await.unwrap();

        assert_eq!(
            log.lines(),
            vec!["You: one", "Assistant: ok", "You: two", "Assistant: ok"]
        );
        assert_eq!(log.scroll_top(), 4);
    }

    #[test]
    fn test_mount_requires_every_handle() {
        type Parts = WidgetParts<LineTrigger<&'static [u8]>, Rc<InputBuffer>, Rc<RecordingLog>>;

        let input = Rc::new(InputBuffer::default());
        let make_trigger = || LineTrigger::new(&b""[..], Rc::clone(&input));

        let missing: [Parts; 3] = [
            WidgetParts {
                trigger: None,
                input: Some(Rc::clone(&input)),
                log: Some(Rc::new(RecordingLog::new())),
            },
            WidgetParts {
                trigger: Some(make_trigger()),
                input: None,
                log: Some(Rc::new(RecordingLog::new())),
            },
            WidgetParts {
                trigger: Some(make_trigger()),
                input: Some(Rc::clone(&input)),
                log: None,
            },
        ];
        for parts in missing {
            let transport = CannedTransport::new(ChatReply::reply("hi"));
            assert!(ChatWidget::mount(parts, transport).is_none());
        }

        let complete: Parts = WidgetParts {
            trigger: Some(make_trigger()),
            input: Some(Rc::clone(&input)),
            log: Some(Rc::new(RecordingLog::new())),
        };
        assert!(ChatWidget::mount(complete, CannedTransport::new(ChatReply::reply("hi"))).is_some());
    }

    #[tokio::test]
    async fn test_run_handles_each_line() {
        let input = Rc::new(InputBuffer::default());
        let log = Rc::new(RecordingLog::new());
        let transport = Arc::new(CannedTransport::new(ChatReply::reply("hi")));
        let parts = WidgetParts {
            trigger: Some(LineTrigger::new(&b"hello\n   \nagain\n"[..], Rc::clone(&input))),
            input: Some(Rc::clone(&input)),
            log: Some(Rc::clone(&log)),
        };

        let report = ChatWidget::mount(parts, Arc::clone(&transport))
            .unwrap()
            .run()
            .await;

        assert_eq!(
            report,
            RunReport {
                skipped: 1,
                rendered: 2,
                failed: 0,
            }
        );
        assert_eq!(
            transport.requests(),
            vec![ChatRequest::new("hello"), ChatRequest::new("again")]
        );
        assert_eq!(log.entries().len(), 4);
        assert_eq!(log.scroll_top(), log.scroll_height());
    }

    #[tokio::test]
    async fn test_run_counts_failures_and_continues() {
        let input = Rc::new(InputBuffer::default());
        let log = Rc::new(RecordingLog::new());
        let parts = WidgetParts {
            trigger: Some(LineTrigger::new(&b"a\nb\n"[..], Rc::clone(&input))),
            input: Some(Rc::clone(&input)),
            log: Some(Rc::clone(&log)),
        };

        let report = ChatWidget::mount(parts, BrokenTransport).unwrap().run().await;

        assert_eq!(report.failed, 2);
        assert_eq!(report.rendered, 0);
        assert!(log.entries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_overlaps_requests_in_reply_order() {
        let input = Rc::new(InputBuffer::default());
        let log = Rc::new(RecordingLog::new());
        let parts = WidgetParts {
            trigger: Some(LineTrigger::new(&b"slow\nfast\n"[..], Rc::clone(&input))),
            input: Some(Rc::clone(&input)),
            log: Some(Rc::clone(&log)),
        };

        let wired = ChatWidget::mount(parts, DelayedTransport).unwrap();
        assert_eq!(wired.widget().input().value(), "");
        assert!(wired.widget().log().entries().is_empty());

        let started = tokio::time::Instant::now();
        let report = wired.run().await;
        let elapsed = started.elapsed();

        assert_eq!(report.rendered, 2);
        assert_eq!(
            log.lines(),
            vec!["You: fast", "Assistant: re fast", "You: slow", "Assistant: re slow"]
        );
        assert!(elapsed >= std::time::Duration::from_millis(500));
        assert!(elapsed < std::time::Duration::from_millis(510));
    }
}
