//! Run command - explain a replayed event stream
//!
//! The replay reader runs as its own task and feeds a bounded channel; the
//! explainer consumes the channel on the current task. Ctrl-C cancels the
//! run, which still flushes whatever frame is on screen.

use anyhow::{Context, Result};
use console::Term;
use std::io::Write;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use playlens::config::{Config, Target};
use playlens::driver::{RunSummary, StreamDriver};
use playlens::explain::{self, BoxedExplainer, Mode};
use playlens::replay::ReplaySource;
use playlens::source::{self, EventSender, EventSource};
use playlens::style::Styler;
use playlens::writer::{PlainWriter, TerminalWriter};

use super::{Cli, Settings};

/// Execute a run with the resolved configuration
pub async fn execute(cli: &Cli, config: &Config) -> Result<RunSummary> {
    let settings = cli.settings(config);
    let explainer = build_explainer(&settings, config.output.target);

    let reader: Box<dyn AsyncRead + Unpin + Send> = match cli.input_path() {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open replay file: {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let (tx, rx) = source::channel(settings.queue_capacity);
    let producer = tokio::spawn(forward(ReplaySource::new(reader), tx));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling run");
            on_interrupt.cancel();
        }
    });

    let result = StreamDriver::new(explainer)
        .with_cancellation(cancel)
        .run(rx)
        .await;

    // The driver has dropped the receiver by now, so the producer cannot block.
    producer.abort();

    Ok(result?)
}

/// Picks writer, styler and explainer for the output target.
fn build_explainer(settings: &Settings, target: Target) -> BoxedExplainer {
    let term = match target {
        Target::Stdout => Term::stdout(),
        Target::Stderr => Term::stderr(),
    };
    let is_terminal = term.is_term();
    let styler = Styler::new(settings.color.resolve(is_terminal));

    match settings.mode {
        Mode::Updating if is_terminal => {
            explain::for_mode(Mode::Updating, TerminalWriter::new(term), styler)
        }
        mode => {
            let mode = if mode == Mode::Updating {
                debug!("output is not a terminal, falling back to plain mode");
                Mode::Plain
            } else {
                mode
            };
            let sink: Box<dyn Write + Send> = match target {
                Target::Stdout => Box::new(std::io::stdout()),
                Target::Stderr => Box::new(std::io::stderr()),
            };
            explain::for_mode(mode, PlainWriter::new(sink), styler)
        }
    }
}

/// Pumps a source into the channel until it ends or the consumer goes away.
async fn forward<S: EventSource>(mut source: S, tx: EventSender) {
    while let Some(next) = source.next_event().await {
        let sent = match next {
            Ok(event) => tx.send(event).await,
            Err(err) => {
                let _ = tx.fail(err).await;
                return;
            }
        };
        if sent.is_err() {
            debug!("explainer stopped before the replay finished");
            return;
        }
    }
}
