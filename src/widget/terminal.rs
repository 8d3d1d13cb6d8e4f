//! Terminal surfaces: stdin lines trigger submissions, entries go to a writer.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::memory::InputBuffer;
use super::surface::{LogSurface, TextInput, Trigger};
use crate::render::LogEntry;

/// A trigger that fires once per line read.
///
/// Each line becomes the input value just before the activation is reported,
/// the way typing then pressing Enter would.
#[derive(Debug)]
pub struct LineTrigger<R> {
    lines: Lines<R>,
    input: Rc<InputBuffer>,
}

impl<R: AsyncBufRead + Unpin> LineTrigger<R> {
    /// Read lines from `reader`, writing each into `input`.
    pub fn new(reader: R, input: Rc<InputBuffer>) -> Self {
        Self {
            lines: reader.lines(),
            input,
        }
    }
}

impl LineTrigger<BufReader<Stdin>> {
    /// Read lines from standard input.
    pub fn stdin(input: Rc<InputBuffer>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), input)
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> Trigger for LineTrigger<R> {
    async fn activated(&mut self) -> bool {
        match self.lines.next_line().await {
            Ok(Some(line)) => {
                self.input.set_value(&line);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Input closed after read error");
                false
            }
        }
    }
}

/// A log surface that writes plain entries, one per line.
#[derive(Debug)]
pub struct WriterLog<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> WriterLog<W> {
    /// Write entries to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl WriterLog<std::io::Stdout> {
    /// Write entries to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> LogSurface for WriterLog<W> {
    fn append(&self, entry: &LogEntry) {
        if let Err(e) = writeln!(self.out.borrow_mut(), "{entry}") {
            tracing::warn!(error = %e, "Failed to write log entry");
        }
    }

    fn scroll_to_bottom(&self) {
        if let Err(e) = self.out.borrow_mut().flush() {
            tracing::warn!(error = %e, "Failed to flush log output");
        }
    }
}
