//! Event explainers.
//!
//! An explainer is a small state machine that consumes one [`Event`] at a
//! time and renders it to a [`TransientWriter`]. All of them share the same
//! play bookkeeping ([`PlayState`]) and failure rendering; they differ in
//! how they frame progress:
//!
//! - [`UpdatingExplainer`] - compact, redraws a two-line frame in place and
//!   only persists play outcomes
//! - [`VerboseExplainer`] - appends a line per task and host result
//! - [`PlainExplainer`] - one line per play, for non-interactive logs
//!
//! # Example
//!
//! ```rust
//! use playlens::event::Event;
//! use playlens::explain::{self, EventExplainer, Mode};
//! use playlens::style::Styler;
//! use playlens::writer::RecordingWriter;
//!
//! let writer = RecordingWriter::new();
//! let mut explainer = explain::for_mode(Mode::Updating, writer.clone(), Styler::plain());
//!
//! for event in [
//!     Event::playbook_start(1),
//!     Event::play_start("Prep"),
//!     Event::task_start("copy certs"),
//!     Event::runner_ok("node1"),
//!     Event::PlaybookEnd,
//! ] {
//!     explainer.explain(&event).unwrap();
//! }
//! explainer.close().unwrap();
//!
//! assert_eq!(writer.durable(), "[OK] 1/1.... Prep\n");
//! ```

mod plain;
mod render;
mod state;
mod updating;
mod verbose;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::Event;
use crate::style::Styler;
use crate::writer::TransientWriter;

pub use plain::PlainExplainer;
pub use render::{failure_block, host_item, OUTPUT_RULE};
pub use state::PlayState;
pub use updating::UpdatingExplainer;
pub use verbose::VerboseExplainer;

/// Presentation mode.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Rewrite the current play's frame in place
    #[default]
    Updating,
    /// Append a line per task and host result
    Verbose,
    /// One line per play, no redraws
    Plain,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Updating => "updating",
            Mode::Verbose => "verbose",
            Mode::Plain => "plain",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "updating" => Ok(Mode::Updating),
            "verbose" => Ok(Mode::Verbose),
            "plain" => Ok(Mode::Plain),
            other => Err(Error::Config(format!("unknown output mode '{other}'"))),
        }
    }
}

/// Consumes events one at a time and renders them.
pub trait EventExplainer: Send {
    /// Renders one event.
    ///
    /// Only sink failures are returned; every event, including ones that
    /// report failures, is data.
    fn explain(&mut self, event: &Event) -> Result<()>;

    /// Flushes any pending frame and closes the writer.
    fn close(&mut self) -> Result<()>;

    /// The presentation mode this explainer implements.
    fn mode(&self) -> Mode;
}

impl<E: EventExplainer + ?Sized> EventExplainer for Box<E> {
    fn explain(&mut self, event: &Event) -> Result<()> {
        (**self).explain(event)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn mode(&self) -> Mode {
        (**self).mode()
    }
}

/// A boxed explainer for dynamic dispatch.
pub type BoxedExplainer = Box<dyn EventExplainer>;

/// Builds the explainer for `mode` on top of `writer`.
pub fn for_mode<W>(mode: Mode, writer: W, styler: Styler) -> BoxedExplainer
where
    W: TransientWriter + 'static,
{
    match mode {
        Mode::Updating => Box::new(UpdatingExplainer::new(writer, styler)),
        Mode::Verbose => Box::new(VerboseExplainer::new(writer, styler)),
        Mode::Plain => Box::new(PlainExplainer::new(writer, styler)),
    }
}
