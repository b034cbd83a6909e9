//! Output sinks with a rewritable frame.
//!
//! A [`TransientWriter`] has two surfaces:
//!
//! - [`transient`](TransientWriter::transient) replaces the pending frame at
//!   the bottom of the output. Only the most recent frame is ever visible.
//! - [`bypass`](TransientWriter::bypass) appends durable content above the
//!   frame. It is never overwritten by later frames.
//!
//! [`flush`](TransientWriter::flush) promotes the pending frame to durable
//! output, and [`close`](TransientWriter::close) flushes and releases the
//! sink. Writers never retry; the first sink error is returned to the caller.
//!
//! # Implementations
//!
//! - [`TerminalWriter`] - redraws the frame in place with cursor movement
//! - [`PlainWriter`] - append-only, for pipes and files
//! - [`RecordingWriter`] - keeps both channels apart for inspection

mod plain;
mod recording;
mod terminal;

pub use plain::PlainWriter;
pub use recording::{Recording, RecordingWriter};
pub use terminal::{frame_rows, Screen, TerminalWriter};

use crate::error::Result;

/// A byte sink with a transient frame and a durable bypass channel.
pub trait TransientWriter: Send {
    /// Replaces the pending frame with `bytes`.
    fn transient(&mut self, bytes: &[u8]) -> Result<()>;

    /// Appends `bytes` as durable output above the pending frame.
    fn bypass(&mut self, bytes: &[u8]) -> Result<()>;

    /// Promotes the pending frame to durable output and clears it.
    fn flush(&mut self) -> Result<()>;

    /// Flushes and releases the sink. Calling `close` again is a no-op.
    fn close(&mut self) -> Result<()>;
}

impl<T: TransientWriter + ?Sized> TransientWriter for Box<T> {
    fn transient(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).transient(bytes)
    }

    fn bypass(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).bypass(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// A boxed writer for dynamic dispatch.
pub type BoxedWriter = Box<dyn TransientWriter>;
