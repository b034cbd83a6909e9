//! Per-run play bookkeeping shared by every explainer.

use crate::pad::play_count_indicator;

/// Where the run currently is.
///
/// One instance lives inside one explainer for the lifetime of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayState {
    /// Plays announced by the playbook; 0 until `PlaybookStart` is seen.
    pub play_count: u32,
    /// 1-based index of the current play.
    pub current_play: u32,
    /// Name of the current play; empty before the first `PlayStart`.
    pub play_name: String,
    /// Last task or handler started in the current play.
    pub current_task: String,
    /// Whether a non-ignored failure happened in the current play.
    pub failed: bool,
    playbook_started: bool,
    in_play: bool,
}

impl PlayState {
    pub fn new() -> Self {
        Self {
            play_count: 0,
            current_play: 1,
            play_name: String::new(),
            current_task: String::new(),
            failed: false,
            playbook_started: false,
            in_play: false,
        }
    }

    /// Records the playbook's play count.
    ///
    /// The first announcement resets the play index. Later ones can only
    /// raise the count.
    pub fn start_playbook(&mut self, play_count: u32) {
        if self.playbook_started {
            self.play_count = self.play_count.max(play_count);
            return;
        }
        self.playbook_started = true;
        self.play_count = play_count;
        self.current_play = 1;
    }

    /// Enters a new play, clearing everything scoped to the previous one.
    pub fn begin_play(&mut self, name: &str) {
        self.play_name.clear();
        self.play_name.push_str(name);
        self.current_task.clear();
        self.failed = false;
        self.in_play = true;
    }

    /// Moves the index on to the next play.
    pub fn advance(&mut self) {
        self.current_play = self.current_play.saturating_add(1);
    }

    /// Whether a `PlayStart` has been seen.
    pub fn in_play(&self) -> bool {
        self.in_play
    }

    pub fn set_task(&mut self, name: &str) {
        self.current_task.clear();
        self.current_task.push_str(name);
    }

    /// The padded `n/N` indicator for the current play.
    pub fn indicator(&self) -> String {
        play_count_indicator(self.current_play, self.play_count)
    }

    /// `"<n/N> <play>"`, the play's status text.
    pub fn play_header(&self) -> String {
        format!("{} {}", self.indicator(), self.play_name)
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}
