//! Streaming explainer that appends one line per significant event.
//!
//! # Example Output
//!
//! ```text
//! 1/2....  Prepare nodes
//! - Running task: copy certificates
//! [OK]   node1
//! [OK]   node2
//! 1/2.... Prepare nodes Finished
//! 2/2....  Optional extras
//! Optional extras Finished With No Tasks
//! ```

use tracing::debug;

use crate::error::Result;
use crate::event::{Event, Failure};
use crate::style::{Palette, Styler};
use crate::writer::TransientWriter;

use super::render::{failure_block, host_item, unhandled};
use super::{EventExplainer, Mode, PlayState};

/// Explainer that never redraws; every line goes straight to durable output.
#[derive(Debug)]
pub struct VerboseExplainer<W: TransientWriter> {
    out: W,
    styler: Styler,
    state: PlayState,
    /// The play header line is still open; nothing has broken it yet.
    pending_status: bool,
    /// A play has started and its footer has not been written.
    pending_message: bool,
}

impl<W: TransientWriter> VerboseExplainer<W> {
    pub fn new(out: W, styler: Styler) -> Self {
        Self {
            out,
            styler,
            state: PlayState::new(),
            pending_status: false,
            pending_message: false,
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

    fn emit(&mut self, text: &str) -> Result<()> {
        self.out.bypass(text.as_bytes())
    }

    /// Ends the open play header line, once.
    fn break_line(&mut self) -> Result<()> {
        if self.pending_status {
            self.pending_status = false;
            self.emit("\n")?;
        }
        Ok(())
    }

    /// Writes the footer for the play in progress, if one is owed.
    ///
    /// A header line that nothing ever broke means the play ran no tasks on
    /// any host.
    fn footer(&mut self) -> Result<()> {
        if !self.pending_message {
            return Ok(());
        }
        let text = if self.pending_status {
            format!(
                "\n{}",
                self.styler.color(
                    Palette::Green,
                    &format!("{} Finished With No Tasks\n", self.state.play_name)
                )
            )
        } else {
            self.styler.color(
                Palette::Green,
                &format!("{} {} Finished\n", self.state.indicator(), self.state.play_name),
            )
        };
        self.pending_message = false;
        self.pending_status = false;
        self.state.advance();
        self.emit(&text)
    }

    fn explain_failure(&mut self, failure: &Failure, task_label: &str) -> Result<()> {
        self.break_line()?;
        let mut buf = format!("{task_label}{}\n", self.state.current_task);
        buf.push_str(&failure_block(&self.styler, failure));
        if !failure.ignore_errors {
            self.state.failed = true;
        }
        self.emit(&buf)
    }
}

impl<W: TransientWriter> EventExplainer for VerboseExplainer<W> {
    fn explain(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::PlaybookStart { play_count } => {
                self.state.start_playbook(*play_count);
                Ok(())
            }

            Event::PlayStart { name } => {
                self.footer()?;
                self.state.begin_play(name);
                self.pending_status = true;
                self.pending_message = true;
                let header = format!("{}  {name}", self.state.indicator());
                self.emit(&header)
            }

            Event::PlaybookEnd => self.footer(),

            Event::TaskStart { name } | Event::HandlerTaskStart { name } => {
                self.break_line()?;
                self.state.set_task(name);
                self.emit(&format!("- Running task: {name}\n"))
            }

            Event::RunnerOk { host } => {
                let line = self.styler.ok(format!("  {host}"));
                self.emit(&line)
            }

            Event::RunnerItemOk { host, item } => {
                let line = self.styler.ok(host_item(host, item.as_deref()));
                self.emit(&line)
            }

            Event::RunnerSkipped { host } => {
                let line = self.styler.skipped(format!("  {host}"));
                self.emit(&line)
            }

            Event::RunnerFailed(failure) => self.explain_failure(failure, "- Running task: "),

            Event::RunnerItemFailed(failure) => self.explain_failure(failure, "- Task: "),

            Event::RunnerUnreachable { host } => {
                self.break_line()?;
                let line = self.styler.unreachable(format!("  {host}"));
                self.emit(&line)
            }

            Event::RunnerItemRetry { .. } => Ok(()),

            Event::Unhandled { tag } => {
                debug!(tag = %tag, "no rendering for event");
                let line = unhandled(&self.styler, tag);
                self.emit(&line)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.out.close()
    }

    fn mode(&self) -> Mode {
        Mode::Verbose
    }
}
