//! Severity decoration for rendered lines.
//!
//! A [`Styler`] prefixes a line with a fixed marker per [`Severity`] and,
//! when ANSI output was chosen by the caller, colors it. Whether the target
//! can display color is decided outside this module.

use std::fmt::Display;

use console::{Color, Style};
use serde::{Deserialize, Serialize};

/// How a status line should be decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Success
    Ok,
    /// Failure that stops the play
    Error,
    /// Failure the play chose to ignore
    ErrorIgnored,
    /// Task skipped on a host
    Skipped,
    /// Host could not be reached
    Unreachable,
    /// Informational, no marker
    Neutral,
}

impl Severity {
    /// The plain-text marker for this severity.
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Ok => "[OK]",
            Severity::Error => "[ERR]",
            Severity::ErrorIgnored => "[IGNORED]",
            Severity::Skipped => "[SKIP]",
            Severity::Unreachable => "[UNREACHABLE]",
            Severity::Neutral => "",
        }
    }

    fn style(self) -> Style {
        match self {
            Severity::Ok => Style::new().green(),
            Severity::Error => Style::new().red().bold(),
            Severity::ErrorIgnored => Style::new().yellow(),
            Severity::Skipped => Style::new().cyan(),
            Severity::Unreachable => Style::new().magenta().bold(),
            Severity::Neutral => Style::new(),
        }
    }
}

/// Colors used for raw colored blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Failure output blocks
    Red,
    /// Play completion footers
    Green,
    /// Warnings about events we cannot render
    Orange,
}

impl Palette {
    fn style(self) -> Style {
        match self {
            Palette::Red => Style::new().red(),
            Palette::Green => Style::new().green(),
            Palette::Orange => Style::new().fg(Color::Color256(208)),
        }
    }
}

/// Stateless line decorator.
///
/// Every method returns a complete line including its trailing newline, so
/// callers can assemble a frame in a `String` and hand it to the writer in
/// one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    ansi: bool,
}

impl Styler {
    /// A styler that emits ANSI color codes.
    pub fn ansi() -> Self {
        Self { ansi: true }
    }

    /// A styler that emits markers only.
    pub fn plain() -> Self {
        Self { ansi: false }
    }

    /// Picks ANSI or plain.
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    /// Whether this styler emits ANSI codes.
    pub fn is_ansi(&self) -> bool {
        self.ansi
    }

    /// Formats `msg` as a line decorated with `severity`.
    pub fn line(&self, severity: Severity, msg: impl Display) -> String {
        let marker = severity.marker();
        if marker.is_empty() {
            return format!("{msg}\n");
        }
        format!("{} {msg}\n", self.paint(severity.style(), marker))
    }

    pub fn ok(&self, msg: impl Display) -> String {
        self.line(Severity::Ok, msg)
    }

    pub fn err(&self, msg: impl Display) -> String {
        self.line(Severity::Error, msg)
    }

    pub fn error_ignored(&self, msg: impl Display) -> String {
        self.line(Severity::ErrorIgnored, msg)
    }

    pub fn skipped(&self, msg: impl Display) -> String {
        self.line(Severity::Skipped, msg)
    }

    pub fn unreachable(&self, msg: impl Display) -> String {
        self.line(Severity::Unreachable, msg)
    }

    pub fn neutral(&self, msg: impl Display) -> String {
        self.line(Severity::Neutral, msg)
    }

    /// The bare marker for `severity`, decorated, without a newline.
    pub fn marker(&self, severity: Severity) -> String {
        self.paint(severity.style(), severity.marker())
    }

    /// Colors raw text. A trailing newline is kept outside the color codes.
    pub fn color(&self, palette: Palette, text: &str) -> String {
        match text.strip_suffix('\n') {
            Some(body) => format!("{}\n", self.paint(palette.style(), body)),
            None => self.paint(palette.style(), text),
        }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.ansi {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Styler {
    fn default() -> Self {
        Self::plain()
    }
}
