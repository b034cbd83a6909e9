//! In-place frame redraw on a terminal.
//!
//! The writer remembers how many rows the last frame occupied. Each new frame
//! first climbs back over those rows and clears them, then draws itself.
//! Bypass content is written in the cleared space and the frame is redrawn
//! underneath it, so durable lines always end up above the frame.
//!
//! Redraw is synchronous with the caller; there is no ticker thread.

use std::io::{self, Write};

use console::Term;
use tracing::debug;

use crate::error::{Error, Result};

use super::TransientWriter;

/// The cursor operations [`TerminalWriter`] needs from a terminal.
pub trait Screen: Send {
    /// Whether the screen is an interactive terminal.
    fn is_terminal(&self) -> bool;

    /// Current width in columns, if it can be determined.
    fn columns(&self) -> Option<usize>;

    /// Writes raw bytes at the cursor.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Clears the row the cursor is on and returns to its first column.
    fn clear_line(&mut self) -> io::Result<()>;

    /// Moves up `n` rows, clearing each of them.
    fn clear_last_lines(&mut self, n: usize) -> io::Result<()>;

    /// Flushes buffered output.
    fn flush(&mut self) -> io::Result<()>;
}

impl Screen for Term {
    fn is_terminal(&self) -> bool {
        self.is_term()
    }

    fn columns(&self) -> Option<usize> {
        self.size_checked()
            .map(|(_rows, cols)| usize::from(cols))
            .filter(|cols| *cols > 0)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        Write::write_all(self, bytes)
    }

    fn clear_line(&mut self) -> io::Result<()> {
        Term::clear_line(self)
    }

    fn clear_last_lines(&mut self, n: usize) -> io::Result<()> {
        Term::clear_last_lines(self, n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// Counts the rows a drawn frame occupies on a screen `columns` wide.
///
/// Returns the number of complete rows above the cursor and whether the
/// cursor sits on a partially written row (the frame did not end in a
/// newline). Escape codes do not count toward width. Without a known width
/// every line counts as one row.
pub fn frame_rows(frame: &str, columns: Option<usize>) -> (usize, bool) {
    let rows_for = |line: &str| match columns {
        Some(cols) if cols > 0 => console::measure_text_width(line).div_ceil(cols).max(1),
        _ => 1,
    };

    let mut lines: Vec<&str> = frame.split('\n').collect();
    let tail = lines.pop().unwrap_or_default();
    let mut rows: usize = lines.iter().map(|line| rows_for(line)).sum();

    if tail.is_empty() {
        return (rows, false);
    }
    rows += rows_for(tail) - 1;
    (rows, true)
}

/// Writer that keeps its frame at the bottom of a terminal.
///
/// On a screen that is not a terminal, or whose width cannot be read, the
/// writer degrades to appending everything and `flush` has nothing to
/// promote.
#[derive(Debug)]
pub struct TerminalWriter<S: Screen = Term> {
    screen: S,
    frame: Vec<u8>,
    rows: usize,
    partial: bool,
    append_only: bool,
    closed: bool,
}

impl TerminalWriter<Term> {
    /// Writer on the process's standard output.
    pub fn stdout() -> Self {
        Self::new(Term::stdout())
    }

    /// Writer on the process's standard error.
    pub fn stderr() -> Self {
        Self::new(Term::stderr())
    }
}

impl<S: Screen> TerminalWriter<S> {
    /// Wraps a screen, choosing append-only mode when it cannot redraw.
    pub fn new(screen: S) -> Self {
        let append_only = !screen.is_terminal() || screen.columns().is_none();
        if append_only {
            debug!("screen cannot redraw in place, frames will be appended");
        }
        Self {
            screen,
            frame: Vec::new(),
            rows: 0,
            partial: false,
            append_only,
            closed: false,
        }
    }

    /// Whether frames are being appended instead of redrawn.
    pub fn is_append_only(&self) -> bool {
        self.append_only
    }

    /// The wrapped screen.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Erases the drawn frame, leaving the cursor where it started.
    fn rewind(&mut self) -> Result<()> {
        if self.partial {
            self.screen.clear_line()?;
        }
        if self.rows > 0 {
            self.screen.clear_last_lines(self.rows)?;
        }
        self.rows = 0;
        self.partial = false;
        Ok(())
    }

    /// Draws the pending frame and records the rows it took.
    fn draw(&mut self) -> Result<()> {
        let Some(columns) = self.screen.columns() else {
            debug!("lost terminal width, switching to append-only output");
            self.append_only = true;
            self.screen.write_bytes(&self.frame)?;
            self.frame.clear();
            self.screen.flush()?;
            return Ok(());
        };

        self.screen.write_bytes(&self.frame)?;
        let (rows, partial) = frame_rows(&String::from_utf8_lossy(&self.frame), Some(columns));
        self.rows = rows;
        self.partial = partial;
        self.screen.flush()?;
        Ok(())
    }
}

impl<S: Screen> TransientWriter for TerminalWriter<S> {
    fn transient(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;
        if self.append_only {
            self.screen.write_bytes(bytes)?;
            return Ok(());
        }

        self.rewind()?;
        self.frame.clear();
        self.frame.extend_from_slice(bytes);
        self.draw()
    }

    fn bypass(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;
        if self.append_only {
            self.screen.write_bytes(bytes)?;
            return Ok(());
        }

        self.rewind()?;
        self.screen.write_bytes(bytes)?;
        if self.frame.is_empty() {
            self.screen.flush()?;
            return Ok(());
        }
        self.draw()
    }

    fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        // The frame stays on screen; it just stops being ours to erase.
        self.frame.clear();
        self.rows = 0;
        self.partial = false;
        self.screen.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }
}
