//! Append-only writer for sinks without a terminal.

use std::io::Write;

use crate::error::{Error, Result};

use super::TransientWriter;

/// Writer that collapses both surfaces to appends.
///
/// Frames become durable the moment they are written, so `flush` has nothing
/// to promote and only flushes the underlying sink.
#[derive(Debug)]
pub struct PlainWriter<W: Write> {
    out: W,
    closed: bool,
}

impl<W: Write> PlainWriter<W> {
    /// Wraps an append-only sink.
    pub fn new(out: W) -> Self {
        Self { out, closed: false }
    }

    /// Returns the wrapped sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        self.out.write_all(bytes)?;
        Ok(())
    }
}

impl<W: Write + Send> TransientWriter for PlainWriter<W> {
    fn transient(&mut self, bytes: &[u8]) -> Result<()> {
        self.append(bytes)
    }

    fn bypass(&mut self, bytes: &[u8]) -> Result<()> {
        self.append(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.out.flush()?;
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
