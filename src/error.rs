//! Error types for Playlens.
//!
//! Only two things can actually go wrong while explaining a run: the event
//! source ends abnormally, or the output sink refuses a write. Everything a
//! playbook itself reports (failed hosts, retries, events we do not know how
//! to render) is data and is rendered, never raised.

use thiserror::Error;

/// Result type alias for Playlens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by an event source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for Playlens.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Stream Errors
    // ========================================================================
    /// The event source ended abnormally. The wrapped error is the source's own.
    #[error("Event source failed: {0}")]
    Source(#[source] SourceError),

    /// A replay line could not be decoded into an event.
    #[error("Invalid replay event on line {line}: {message}")]
    Replay {
        /// 1-based line number in the replay input
        line: usize,
        /// Decoder message
        message: String,
    },

    // ========================================================================
    // Sink Errors
    // ========================================================================
    /// Writing to the output sink failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// The writer was used after `close()`.
    #[error("Writer is closed")]
    Closed,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Wraps an arbitrary producer error as a source failure.
    pub fn from_source(err: impl Into<SourceError>) -> Self {
        Self::Source(err.into())
    }

    /// Creates a new replay decode error.
    pub fn replay(line: usize, message: impl Into<String>) -> Self {
        Self::Replay {
            line,
            message: message.into(),
        }
    }

    /// Returns true if this error came from the output sink.
    pub fn is_sink_failure(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Closed)
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Source(_) => 2,
            Error::Io(_) | Error::Closed => 3,
            Error::Replay { .. }
            | Error::Config(_)
            | Error::JsonParse(_)
            | Error::YamlParse(_)
            | Error::TomlParse(_) => 4,
        }
    }
}
