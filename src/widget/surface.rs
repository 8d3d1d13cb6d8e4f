//! Handles the widget is wired to.
//!
//! A host looks these up under fixed identifiers and hands them to
//! [`ChatWidget::mount`](super::ChatWidget::mount).

use std::rc::Rc;

use async_trait::async_trait;

use crate::render::LogEntry;

/// Identifier of the send trigger.
pub const TRIGGER_ID: &str = "chat-btn";
/// Identifier of the text input.
pub const INPUT_ID: &str = "chat-input";
/// Identifier of the log surface.
pub const LOG_ID: &str = "chat-box";

/// The control whose activation starts a submission.
#[async_trait(?Send)]
pub trait Trigger {
    /// Wait for the next activation.
    ///
    /// Returns `false` once the trigger is closed and will never fire again.
    /// Must be cancel safe: the widget polls it alongside in-flight requests.
    async fn activated(&mut self) -> bool;
}

/// The text control the message is read from.
pub trait TextInput {
    /// Current value.
    fn value(&self) -> String;
    /// Replace the current value.
    fn set_value(&self, value: &str);
}

/// Append-only container showing the conversation.
pub trait LogSurface {
    /// Append one rendered entry.
    fn append(&self, entry: &LogEntry);
    /// Scroll to the bottom-most position.
    fn scroll_to_bottom(&self);
}

impl<T: TextInput + ?Sized> TextInput for Rc<T> {
    fn value(&self) -> String {
        (**self).value()
    }

    fn set_value(&self, value: &str) {
        (**self).set_value(value);
    }
}

impl<T: LogSurface + ?Sized> LogSurface for Rc<T> {
    fn append(&self, entry: &LogEntry) {
        (**self).append(entry);
    }

    fn scroll_to_bottom(&self) {
        (**self).scroll_to_bottom();
    }
}
