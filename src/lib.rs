//! # Playlens - Live Progress for Playbook Runs
//!
//! Playlens turns the event stream of a provisioning run (plays starting,
//! tasks starting, per-host results) into human-readable terminal output.
//! Events are data: failed hosts, retries and unknown event kinds are all
//! rendered, never raised. The only errors are a broken event source and a
//! broken output sink.
//!
//! ## Core Concepts
//!
//! - **Events**: A closed set of playbook observations ([`event::Event`])
//! - **Explainers**: State machines that render one event at a time
//! - **Transient writers**: Sinks with a redrawable frame and a durable channel
//! - **Sources**: Ordered, single-producer event streams
//! - **Driver**: Pumps a source into an explainer and always closes it
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐    bounded    ┌──────────────────┐
//! │   EventSource    │ ───channel──▶ │   StreamDriver   │
//! │ (replay, custom) │               │  (cancellation)  │
//! └──────────────────┘               └──────────────────┘
//!                                             │
//!                                             ▼
//!                                    ┌──────────────────┐
//!                                    │  EventExplainer  │
//!                                    │ updating/verbose │
//!                                    │      /plain      │
//!                                    └──────────────────┘
//!                                             │
//!                                             ▼
//!                                    ┌──────────────────┐
//!                                    │ TransientWriter  │
//!                                    │ frame + bypass   │
//!                                    └──────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use playlens::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> playlens::Result<()> {
//! let writer = RecordingWriter::new();
//! let explainer = explain::for_mode(Mode::Verbose, writer.clone(), Styler::plain());
//!
//! let events = [
//!     Event::playbook_start(1),
//!     Event::play_start("Prep"),
//!     Event::task_start("ping"),
//!     Event::runner_ok("node1"),
//!     Event::PlaybookEnd,
//! ];
//! let summary = StreamDriver::new(explainer)
//!     .run(source::from_events(events))
//!     .await?;
//!
//! assert_eq!(summary.events, 5);
//! assert!(writer.durable().contains("[OK]   node1"));
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Error handling
    pub use crate::error::{Error, Result};

    // Events
    pub use crate::event::{Event, Failure};

    // Rendering
    pub use crate::explain::{self, BoxedExplainer, EventExplainer, Mode};
    pub use crate::style::{Severity, Styler};
    pub use crate::writer::{PlainWriter, RecordingWriter, TerminalWriter, TransientWriter};

    // Streaming
    pub use crate::driver::{RunSummary, StreamDriver};
    pub use crate::source::{self, EventSender, EventSource};
}

pub use error::{Error, Result};

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases for Playlens operations.
pub mod error;

/// The playbook event model.
pub mod event;

// ============================================================================
// Rendering
// ============================================================================

/// Fixed-width padding and the play-count indicator.
pub mod pad;

/// Severity markers and optional ANSI styling.
pub mod style;

/// Output sinks with a transient frame and a durable channel.
pub mod writer;

/// Event explainers for each presentation mode.
pub mod explain;

// ============================================================================
// Streaming
// ============================================================================

/// Event sources and the bounded event channel.
pub mod source;

/// JSON-lines event replay.
pub mod replay;

/// Drives an explainer from a source.
pub mod driver;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration management.
///
/// Handles loading and merging configuration from multiple sources:
/// config files and environment variables.
pub mod config;
