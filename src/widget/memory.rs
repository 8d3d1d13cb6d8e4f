//! In-memory surfaces for headless hosts and tests.

use std::cell::{Cell, RefCell};

use super::surface::{LogSurface, TextInput};
use crate::render::LogEntry;

/// A text input backed by a string buffer.
#[derive(Debug, Default)]
pub struct InputBuffer {
    value: RefCell<String>,
}

impl InputBuffer {
    /// Create an input holding `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(value.into()),
        }
    }
}

impl TextInput for InputBuffer {
    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_owned();
    }
}

/// A log surface that records everything appended to it.
///
/// Each entry counts as one row, so the scroll height is the entry count.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: RefCell<Vec<LogEntry>>,
    markup: RefCell<String>,
    scroll_top: Cell<usize>,
}

impl RecordingLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries appended so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Plain renderings of the entries, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.borrow().iter().map(ToString::to_string).collect()
    }

    /// Accumulated markup, as a container accepting injected HTML would hold it.
    pub fn markup(&self) -> String {
        self.markup.borrow().clone()
    }

    /// Current scroll offset, in rows.
    pub fn scroll_top(&self) -> usize {
        self.scroll_top.get()
    }

    /// Total scrollable height, in rows.
    pub fn scroll_height(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl LogSurface for RecordingLog {
    fn append(&self, entry: &LogEntry) {
        self.markup.borrow_mut().push_str(&entry.to_html());
        self.entries.borrow_mut().push(entry.clone());
    }

    fn scroll_to_bottom(&self) {
        self.scroll_top.set(self.scroll_height());
    }
}
