//! CLI module for Playlens
//!
//! This module provides the command-line interface for Playlens: argument
//! parsing, resolving flags against the loaded configuration, and running a
//! replay through the selected explainer.

pub mod run;

use clap::Parser;
use std::path::PathBuf;

use playlens::config::{ColorChoice, Config};
use playlens::explain::Mode;

/// Playlens - live progress for playbook runs
///
/// Reads a JSON-lines stream of playbook events and explains it on the
/// terminal, either as a compact self-updating view or as a verbose log.
#[derive(Parser, Debug, Clone)]
#[command(name = "playlens")]
#[command(author = "Playlens Contributors")]
#[command(version)]
#[command(about = "Explain a stream of playbook events", long_about = None)]
pub struct Cli {
    /// Replay file with one JSON event per line ('-' or absent reads stdin)
    pub input: Option<PathBuf>,

    /// Presentation mode
    #[arg(short = 'm', long)]
    pub mode: Option<Mode>,

    /// Verbosity level (-v selects verbose mode, -vv and up also raise log detail)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// When to color output
    #[arg(long, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Events buffered between reader and explainer
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "PLAYLENS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Effective settings after flags are applied over configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub color: ColorChoice,
    pub queue_capacity: usize,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-4)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(4)
    }

    /// Replay path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }

    /// Log filter for the given config, raised by repeated `-v`.
    pub fn log_filter(&self, config: &Config) -> String {
        match self.verbosity() {
            0 | 1 => config.logging.log_level.clone(),
            2 => "info".to_string(),
            3 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }

    /// Applies flags over the loaded configuration.
    pub fn settings(&self, config: &Config) -> Settings {
        let mode = match (self.mode, self.verbose) {
            (Some(mode), _) => mode,
            (None, 0) => config.output.mode,
            (None, _) => Mode::Verbose,
        };
        let color = if self.no_color {
            ColorChoice::Never
        } else {
            self.color.unwrap_or(config.output.color)
        };
        Settings {
            mode,
            color,
            queue_capacity: self
                .queue_capacity
                .unwrap_or(config.stream.queue_capacity)
                .max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["playlens", "run.jsonl"]).unwrap();
        assert_eq!(cli.input_path(), Some(&PathBuf::from("run.jsonl")));

        let cli = Cli::try_parse_from(["playlens", "-"]).unwrap();
        assert_eq!(cli.input_path(), None);
    }

    #[test]
    fn test_verbose_flag_selects_verbose_mode() {
        let cli = Cli::try_parse_from(["playlens", "-v"]).unwrap();
        assert_eq!(cli.settings(&Config::default()).mode, Mode::Verbose);

        let cli = Cli::try_parse_from(["playlens", "-v", "--mode", "plain"]).unwrap();
        assert_eq!(cli.settings(&Config::default()).mode, Mode::Plain);
    }

    #[test]
    fn test_verbosity_raises_log_level() {
        let config = Config::default();
        let cli = Cli::try_parse_from(["playlens", "-v"]).unwrap();
        assert_eq!(cli.log_filter(&config), "warn");
        let cli = Cli::try_parse_from(["playlens", "-vvv"]).unwrap();
        assert_eq!(cli.log_filter(&config), "debug");
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.output.color = ColorChoice::Always;
        config.stream.queue_capacity = 16;

        let cli = Cli::try_parse_from(["playlens", "--no-color", "--queue-capacity", "0"]).unwrap();
        let settings = cli.settings(&config);
        assert_eq!(settings.color, ColorChoice::Never);
        assert_eq!(settings.queue_capacity, 1);

        let cli = Cli::try_parse_from(["playlens"]).unwrap();
        let settings = cli.settings(&config);
        assert_eq!(settings.color, ColorChoice::Always);
        assert_eq!(settings.queue_capacity, 16);
        assert_eq!(settings.mode, Mode::Updating);
    }

    #[test]
    fn test_color_conflicts_with_no_color() {
        assert!(Cli::try_parse_from(["playlens", "--color", "always", "--no-color"]).is_err());
    }
}
