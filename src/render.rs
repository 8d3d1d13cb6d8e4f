//! Log entries rendered onto the log surface.

use std::fmt;

/// Who a log entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The local user.
    You,
    /// The remote assistant.
    Assistant,
}

impl Speaker {
    /// Label shown in front of the entry text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::You => "You",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single line in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Author of the line.
    pub speaker: Speaker,
    /// Line text, as sent or received.
    pub text: String,
}

impl LogEntry {
    /// Entry for a message the user sent.
    #[must_use]
    pub fn you(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::You,
            text: text.into(),
        }
    }

    /// Entry for the assistant's answer.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    /// Markup for surfaces that accept injected HTML.
    ///
    /// The text is escaped; the label is emitted in bold.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<div><b>{}:</b> {}</div>",
            self.speaker.label(),
            escape_html(&self.text)
        )
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.label(), self.text)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
