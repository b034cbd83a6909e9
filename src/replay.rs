//! JSON-lines event replay.
//!
//! Each non-blank line holds one event object tagged by its `type` field:
//!
//! ```text
//! {"type": "PlaybookStart", "play_count": 1}
//! {"type": "PlayStart", "name": "Prepare nodes"}
//! {"type": "RunnerOK", "host": "node1"}
//! ```
//!
//! Tags this crate does not know become [`Event::Unhandled`] rather than
//! errors, so newer producers can be replayed by older readers.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::trace;

use crate::error::{Error, Result};
use crate::event::Event;
use crate::source::EventSource;

/// Decodes one replay line.
///
/// Returns `Ok(None)` for blank lines. `line` is 1-based and only used for
/// error reporting.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Event>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::replay(line, e.to_string()))?;
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::replay(line, "missing string field 'type'"))?;

    if !Event::KNOWN_TAGS.contains(&tag) {
        return Ok(Some(Event::unhandled(tag)));
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| Error::replay(line, e.to_string()))
}

/// Reads events from a JSON-lines stream.
///
/// A malformed line ends the stream with [`Error::Replay`].
pub struct ReplaySource<R> {
    lines: FramedRead<R, LinesCodec>,
    line: usize,
    done: bool,
}

impl<R: AsyncRead + Unpin + Send> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new()),
            line: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> EventSource for ReplaySource<R> {
    async fn next_event(&mut self) -> Option<Result<Event>> {
        if self.done {
            return None;
        }
        loop {
            let text = match self.lines.next().await? {
                Ok(text) => text,
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::replay(self.line + 1, e.to_string())));
                }
            };
            self.line += 1;
            match parse_line(self.line, &text) {
                Ok(Some(event)) => {
                    trace!(line = self.line, tag = event.tag(), "replayed event");
                    return Some(Ok(event));
                }
                Ok(None) => continue,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
