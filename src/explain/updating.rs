//! Compact explainer that rewrites a two-line frame as the play progresses.
//!
//! The frame shows the play header and whatever the current task or host is
//! doing. Only play outcomes reach durable output: one OK line per
//! successful play, or the failure block for a failed one.
//!
//! # Example Output
//!
//! ```text
//! [OK] 1/3.... Prepare nodes
//! [ERR] 2/3.... Install packages
//! - Task: install docker
//! [ERR]   node2: No package matching 'docker-ce' found
//! 3/3.... Start services          <- frame, redrawn in place
//! - Task: start kubelet
//! ```

use tracing::debug;

use crate::error::Result;
use crate::event::{Event, Failure};
use crate::style::{Severity, Styler};
use crate::writer::TransientWriter;

use super::render::{failure_block, host_item, unhandled};
use super::{EventExplainer, Mode, PlayState};

/// Which failure header the current play has already printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureHeader {
    None,
    Ignored,
    Error,
}

/// Explainer that keeps in-progress state in the writer's transient frame.
#[derive(Debug)]
pub struct UpdatingExplainer<W: TransientWriter> {
    out: W,
    styler: Styler,
    state: PlayState,
    /// The current play still owes its OK line.
    status_owed: bool,
    header: FailureHeader,
}

impl<W: TransientWriter> UpdatingExplainer<W> {
    pub fn new(out: W, styler: Styler) -> Self {
        Self {
            out,
            styler,
            state: PlayState::new(),
            status_owed: false,
            header: FailureHeader::None,
        }
    }

    /// Current play bookkeeping.
    pub fn state(&self) -> &PlayState {
        &self.state
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn header_line(&self) -> String {
        format!("{}\n", self.state.play_header())
    }

    fn frame(&mut self, body: &str) -> Result<()> {
        let frame = format!("{}{body}", self.header_line());
        self.out.transient(frame.as_bytes())
    }

    /// Writes the OK line for the current play if it is still owed.
    fn promote_ok(&mut self) -> Result<()> {
        if !self.status_owed {
            return Ok(());
        }
        self.status_owed = false;
        let line = self.styler.ok(self.state.play_header());
        self.out.bypass(line.as_bytes())
    }

    fn explain_failure(&mut self, failure: &Failure) -> Result<()> {
        let mut buf = String::new();

        // Ignored failures get their own header, but a real failure after
        // one still needs the error header.
        let (severity, needed) = match (failure.ignore_errors, self.header) {
            (true, FailureHeader::None) => (Severity::ErrorIgnored, true),
            (false, FailureHeader::None | FailureHeader::Ignored) => (Severity::Error, true),
            _ => (Severity::Error, false),
        };
        if needed {
            buf.push_str(&self.styler.line(severity, self.state.play_header()));
            buf.push_str(&format!("- Task: {}\n", self.state.current_task));
            self.header = if failure.ignore_errors {
                FailureHeader::Ignored
            } else {
                FailureHeader::Error
            };
        }

        buf.push_str(&failure_block(&self.styler, failure));
        self.out.bypass(buf.as_bytes())?;

        if !failure.ignore_errors {
            self.state.failed = true;
            self.status_owed = false;
        }
        Ok(())
    }
}

impl<W: TransientWriter> EventExplainer for UpdatingExplainer<W> {
    fn explain(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::PlaybookStart { play_count } => {
                self.state.start_playbook(*play_count);
                Ok(())
            }

            Event::PlayStart { name } => {
                if self.state.in_play() {
                    self.promote_ok()?;
                    self.state.advance();
                }
                self.state.begin_play(name);
                self.status_owed = true;
                self.header = FailureHeader::None;
                let header = self.header_line();
                self.out.transient(header.as_bytes())
            }

            Event::PlaybookEnd => {
                self.promote_ok()?;
                // Every outcome is durable now; drop the frame.
                self.out.transient(b"")
            }

            Event::TaskStart { name } => {
                self.state.set_task(name);
                self.frame(&format!("- Task: {name}\n"))
            }

            Event::HandlerTaskStart { name } => {
                self.state.set_task(name);
                // The name is kept even when a failed play hides the frame.
                if self.state.failed {
                    return Ok(());
                }
                self.frame(&format!("- Task:  {name}\n"))
            }

            Event::RunnerOk { host } => {
                let line = self
                    .styler
                    .ok(format!("- {host} {}", self.state.current_task));
                self.frame(&line)
            }

            Event::RunnerItemOk { host, item } => {
                let line = self.styler.ok(host_item(host, item.as_deref()));
                self.frame(&line)
            }

            Event::RunnerSkipped { host } => {
                let line = self
                    .styler
                    .skipped(format!("- {host} {}", self.state.current_task));
                self.frame(&line)
            }

            Event::RunnerItemRetry {
                host,
                attempts,
                max_retries,
            } => {
                let line = format!(
                    "- [{host}] Retrying: {} ({attempts}/{max_retries} attempts)\n",
                    self.state.current_task
                );
                self.frame(&line)
            }

            Event::RunnerFailed(failure) | Event::RunnerItemFailed(failure) => {
                self.explain_failure(failure)
            }

            Event::RunnerUnreachable { host } => {
                let mut buf = self.header_line();
                buf.push_str(&self.styler.unreachable(format!("  {host}")));
                self.out.bypass(buf.as_bytes())
            }

            Event::Unhandled { tag } => {
                debug!(tag = %tag, "no rendering for event");
                self.out.bypass(unhandled(&self.styler, tag).as_bytes())
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.out.close()
    }

    fn mode(&self) -> Mode {
        Mode::Updating
    }
}
