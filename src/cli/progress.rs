//! Console progress sink
//!
//! Keeps a one-line status on stderr while pages arrive, so stdout carries
//! only results.

use crate::pagination::ProgressSink;
use std::io::{IsTerminal, Write};

/// Writes retrieval progress to a terminal
pub struct ConsoleProgress<W: Write + Send = std::io::Stderr> {
    label: String,
    out: W,
    pages: usize,
    // Rewrite the status line in place; off for pipes and files
    overwrite: bool,
    // A status line was written without its newline
    line_open: bool,
}

impl ConsoleProgress {
    /// Progress on stderr, overwritten in place when stderr is a terminal
    pub fn stderr(label: impl Into<String>) -> Self {
        let out = std::io::stderr();
        let overwrite = out.is_terminal();
        Self::with_writer(label, out, overwrite)
    }
}

impl<W: Write + Send> ConsoleProgress<W> {
    /// Progress on any writer
    pub fn with_writer(label: impl Into<String>, out: W, overwrite: bool) -> Self {
        Self {
            label: label.into(),
            out,
            pages: 0,
            overwrite,
            line_open: false,
        }
    }

    /// Consume the sink, returning its writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Terminate a pending status line
    ///
    /// Needed when a run ends without `on_finished`, so later stderr output
    /// starts on a fresh line.
    pub fn end_line(&mut self) {
        if self.line_open {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.line_open = false;
        }
    }

    fn status(&mut self, fetched: usize) {
        let line = format!(
            "{}: {fetched} item(s), {} page(s)",
            self.label, self.pages
        );
        // Progress is best effort; a closed stderr must not fail the listing
        let _ = if self.overwrite {
            self.line_open = true;
            write!(self.out, "\r\x1b[2K{line}")
        } else {
            writeln!(self.out, "{line}")
        };
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> ProgressSink for ConsoleProgress<W> {
    fn on_started(&mut self, _page_size_hint: u32) {
        self.pages = 0;
    }

    fn on_page_completed(&mut self, fetched_so_far: usize, _page_size_hint: u32) {
        self.pages += 1;
        if self.overwrite {
            self.status(fetched_so_far);
        }
    }

    fn on_finished(&mut self, total_fetched: usize) {
        self.status(total_fetched);
        self.end_line();
    }
}
