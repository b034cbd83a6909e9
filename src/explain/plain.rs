//! One line per play, for logs that are read after the fact.
//!
//! Each play gets a single line that is closed with an OK marker when the
//! next play (or the end of the playbook) arrives. Failures and unreachable
//! hosts break the line and are printed with the task they happened in.
//! Successful hosts, skips, retries and task starts print nothing.
//!
//! # Example Output
//!
//! ```text
//! 1/3....  Prepare nodes  [OK]
//! 2/3....  Install packages
//! - Running task: install docker
//! [ERR]   node2: No package matching 'docker-ce' found
//! 3/3....  Start services  [OK]
//! ```

use crate::error::Result;
use crate::event::{Event, Failure};
use crate::style::{Severity, Styler};
use crate::writer::TransientWriter;

use super::render::failure_block;
use super::{EventExplainer, Mode, PlayState};

/// Append-only explainer with one status line per play.
#[derive(Debug)]
pub struct PlainExplainer<W: TransientWriter> {
    out: W,
    styler: Styler,
    state: PlayState,
    /// The play line is open and still owed its OK marker.
    pending_status: bool,
}

impl<W: TransientWriter> PlainExplainer<W> {
    pub fn new(out: W, styler: Styler) -> Self {
        Self {
            out,
            styler,
            state: PlayState::new(),
            pending_status: false,
        }
    }

    /// Current play bookkeeping.
    pub fn state(&self) -> &PlayState {
        &self.state
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.out.bypass(text.as_bytes())
    }

    fn close_play_line(&mut self) -> Result<()> {
        if !self.pending_status {
            return Ok(());
        }
        self.pending_status = false;
        let marker = format!("  {}\n", self.styler.marker(Severity::Ok));
        self.emit(&marker)
    }

    fn break_line(&mut self) -> Result<()> {
        if self.pending_status {
            self.pending_status = false;
            self.emit("\n")?;
        }
        Ok(())
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

impl<W: TransientWriter> EventExplainer for PlainExplainer<W> {
    fn explain(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::PlaybookStart { play_count } => {
                self.state.start_playbook(*play_count);
                Ok(())
            }

            Event::PlayStart { name } => {
                self.close_play_line()?;
                if self.state.in_play() {
                    self.state.advance();
                }
                self.state.begin_play(name);
                self.pending_status = true;
                let line = format!("{}  {name}", self.state.indicator());
                self.emit(&line)
            }

            Event::PlaybookEnd => self.close_play_line(),

            Event::TaskStart { name } | Event::HandlerTaskStart { name } => {
                self.state.set_task(name);
                Ok(())
            }

            Event::RunnerFailed(failure) => self.explain_failure(failure, "- Running task: "),

            Event::RunnerItemFailed(failure) => self.explain_failure(failure, "- Task: "),

            Event::RunnerUnreachable { host } => {
                self.break_line()?;
                let line = self.styler.unreachable(format!("  {host}"));
                self.emit(&line)
            }

            Event::RunnerOk { .. }
            | Event::RunnerItemOk { .. }
            | Event::RunnerSkipped { .. }
            | Event::RunnerItemRetry { .. }
            | Event::Unhandled { .. } => Ok(()),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.out.close()
    }

    fn mode(&self) -> Mode {
        Mode::Plain
    }
}
