//! Playlens - live progress for playbook runs
//!
//! This is the main entry point for the Playlens CLI.

mod cli;

use anyhow::Result;
use cli::Cli;
use colored::Colorize;
use playlens::config::{ColorChoice, Config};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            err.downcast_ref::<playlens::Error>()
                .map_or(1, playlens::Error::exit_code)
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> Result<()> {
    // Load configuration; logging is not up yet, so failures go straight to main
    let config = Config::load(cli.config.as_ref())?;

    init_logging(cli.verbosity(), &cli.log_filter(&config));

    if cli.settings(&config).color == ColorChoice::Never {
        colored::control::set_override(false);
    }

    let summary = cli::run::execute(cli, &config).await?;
    debug!(
        events = summary.events,
        cancelled = summary.cancelled,
        "run complete"
    );
    Ok(())
}

/// Initialize logging on stderr, so it never lands inside the redrawn frame
fn init_logging(verbosity: u8, filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}
