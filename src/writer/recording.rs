//! In-memory writer that keeps the transient and durable channels apart.
//!
//! Clones share the same recording, so a test can hand one clone to an
//! explainer and read the other afterwards.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};

use super::TransientWriter;

/// Everything a [`RecordingWriter`] has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recording {
    /// Durable output as a terminal would leave it: bypass writes and
    /// flushed frames, in order.
    pub durable: Vec<u8>,
    /// Bypass writes only.
    pub bypass: Vec<u8>,
    /// Every transient write, oldest first.
    pub frames: Vec<Vec<u8>>,
    /// The frame currently pending.
    pub pending: Vec<u8>,
    /// Number of `flush` calls.
    pub flushes: usize,
    /// Whether `close` has been called.
    pub closed: bool,
}

#[derive(Debug, Default)]
struct Shared {
    recording: Recording,
    /// Writes left before the sink starts failing.
    fail_after: Option<usize>,
}

/// A writer that records rather than displays.
#[derive(Debug, Clone, Default)]
pub struct RecordingWriter {
    shared: Arc<Mutex<Shared>>,
}

impl RecordingWriter {
    /// Creates an empty recording writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer whose sink breaks after `writes` successful writes.
    pub fn failing_after(writes: usize) -> Self {
        let writer = Self::new();
        writer.shared.lock().fail_after = Some(writes);
        writer
    }

    /// Snapshot of the recording so far.
    pub fn recording(&self) -> Recording {
        self.shared.lock().recording.clone()
    }

    /// Durable output as text.
    pub fn durable(&self) -> String {
        String::from_utf8_lossy(&self.shared.lock().recording.durable).into_owned()
    }

    /// Durable output split into lines.
    pub fn durable_lines(&self) -> Vec<String> {
        self.durable().lines().map(str::to_string).collect()
    }

    /// Bypass-only output as text.
    pub fn bypass_output(&self) -> String {
        String::from_utf8_lossy(&self.shared.lock().recording.bypass).into_owned()
    }

    /// Every transient frame as text, oldest first.
    pub fn frames(&self) -> Vec<String> {
        self.shared
            .lock()
            .recording
            .frames
            .iter()
            .map(|frame| String::from_utf8_lossy(frame).into_owned())
            .collect()
    }

    /// The frame still pending, as text.
    pub fn pending(&self) -> String {
        String::from_utf8_lossy(&self.shared.lock().recording.pending).into_owned()
    }

    /// Whether the writer has been closed.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().recording.closed
    }

    fn check(shared: &mut Shared) -> Result<()> {
        if shared.recording.closed {
            return Err(Error::Closed);
        }
        match shared.fail_after.as_mut() {
            Some(0) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "recording sink failed").into()),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl TransientWriter for RecordingWriter {
    fn transient(&mut self, bytes: &[u8]) -> Result<()> {
        let mut shared = self.shared.lock();
        Self::check(&mut shared)?;
        let recording = &mut shared.recording;
        recording.frames.push(bytes.to_vec());
        recording.pending = bytes.to_vec();
        Ok(())
    }

    fn bypass(&mut self, bytes: &[u8]) -> Result<()> {
        let mut shared = self.shared.lock();
        Self::check(&mut shared)?;
        let recording = &mut shared.recording;
        recording.bypass.extend_from_slice(bytes);
        recording.durable.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut shared = self.shared.lock();
        let recording = &mut shared.recording;
        if recording.closed {
            return Ok(());
        }
        let pending = std::mem::take(&mut recording.pending);
        recording.durable.extend_from_slice(&pending);
        recording.flushes += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.flush()?;
        self.shared.lock().recording.closed = true;
        Ok(())
    }
}
