//! Stream driver: pumps events from a source into an explainer.
//!
//! The driver owns the consumer side of a run. It pulls events in order,
//! hands each one to the explainer, and guarantees the explainer is closed
//! on every exit path: normal end, source failure, sink failure, and
//! cancellation. The first error wins; an error from `close()` after an
//! earlier failure is logged and dropped.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::explain::EventExplainer;
use crate::source::EventSource;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events handed to the explainer
    pub events: usize,
    /// The run was stopped by cancellation rather than by the source ending
    pub cancelled: bool,
}

/// Drives one explainer from one event source.
pub struct StreamDriver<E> {
    explainer: E,
    cancel: Option<CancellationToken>,
}

impl<E: EventExplainer> StreamDriver<E> {
    pub fn new(explainer: E) -> Self {
        Self {
            explainer,
            cancel: None,
        }
    }

    /// Stops the run when `token` is cancelled.
    ///
    /// An event already received when the token fires is still explained.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Runs until the source ends, fails, or the run is cancelled.
    ///
    /// Source errors are returned unchanged. The explainer is closed before
    /// this returns, whatever the outcome.
    pub async fn run<S: EventSource>(mut self, mut source: S) -> Result<RunSummary> {
        debug!(mode = %self.explainer.mode(), "starting event stream");
        let outcome = self.pump(&mut source).await;
        let closed = self.explainer.close();

        match (outcome, closed) {
            (Ok(summary), Ok(())) => {
                debug!(
                    events = summary.events,
                    cancelled = summary.cancelled,
                    "event stream finished"
                );
                Ok(summary)
            }
            (Ok(_), Err(err)) => {
                warn!(error = %err, "failed to close output");
                Err(err)
            }
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    warn!(error = %close_err, "failed to close output after earlier error");
                }
                Err(err)
            }
        }
    }

    async fn pump<S: EventSource>(&mut self, source: &mut S) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            let next = match &self.cancel {
                Some(token) => tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(events = summary.events, "event stream cancelled");
                        summary.cancelled = true;
                        return Ok(summary);
                    }
                    next = source.next_event() => next,
                },
                None => source.next_event().await,
            };

            match next {
                None => return Ok(summary),
                Some(Err(err)) => {
                    warn!(error = %err, "event source ended abnormally");
                    return Err(err);
                }
                Some(Ok(event)) => {
                    trace!(tag = event.tag(), "explaining event");
                    self.explainer.explain(&event)?;
                    summary.events += 1;
                }
            }
        }
    }
}
