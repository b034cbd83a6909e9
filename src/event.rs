//! Playbook run events.
//!
//! An [`Event`] is one observation emitted by the provisioning driver while it
//! runs a playbook: plays and tasks starting, and per-host runner results.
//! The set is closed; anything the producer emits that we do not model is
//! carried as [`Event::Unhandled`] so it can still be reported.

use serde::{Deserialize, Serialize};

/// Outcome of a failed task on one host, shared by [`Event::RunnerFailed`]
/// and [`Event::RunnerItemFailed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Host the task failed on
    pub host: String,
    /// Loop item, for item failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    /// Whether the task was marked `ignore_errors`
    #[serde(default)]
    pub ignore_errors: bool,
    /// Failure message reported by the module
    #[serde(default)]
    pub message: String,
    /// Captured standard output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// Captured standard error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl Failure {
    /// Creates a failure for `host` with the given message.
    pub fn new(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Marks the failure as ignored by the play.
    #[must_use]
    pub fn ignoring_errors(mut self) -> Self {
        self.ignore_errors = true;
        self
    }

    /// Attaches the loop item that failed.
    #[must_use]
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Attaches captured stdout.
    #[must_use]
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    /// Attaches captured stderr.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }

    /// Loop item, if one was reported and is non-empty.
    pub fn item(&self) -> Option<&str> {
        non_empty(self.item.as_deref())
    }

    /// Captured stdout, if non-empty.
    pub fn stdout(&self) -> Option<&str> {
        non_empty(self.stdout.as_deref())
    }

    /// Captured stderr, if non-empty.
    pub fn stderr(&self) -> Option<&str> {
        non_empty(self.stderr.as_deref())
    }
}

/// A single event in a playbook run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The playbook started; `play_count` is the number of plays it holds.
    PlaybookStart {
        /// Total plays in the playbook
        play_count: u32,
    },
    /// The playbook finished.
    PlaybookEnd,
    /// A play started.
    PlayStart {
        /// Play name
        name: String,
    },
    /// A task started.
    TaskStart {
        /// Task name
        name: String,
    },
    /// A handler task started.
    HandlerTaskStart {
        /// Handler name
        name: String,
    },
    /// The current task succeeded on a host.
    #[serde(rename = "RunnerOK")]
    RunnerOk {
        /// Host name
        host: String,
    },
    /// One loop item of the current task succeeded on a host.
    #[serde(rename = "RunnerItemOK")]
    RunnerItemOk {
        /// Host name
        host: String,
        /// Loop item
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
    },
    /// The current task was skipped on a host.
    RunnerSkipped {
        /// Host name
        host: String,
    },
    /// The current task failed on a host.
    RunnerFailed(Failure),
    /// One loop item of the current task failed on a host.
    RunnerItemFailed(Failure),
    /// A host could not be reached.
    RunnerUnreachable {
        /// Host name
        host: String,
    },
    /// The current task is being retried on a host.
    RunnerItemRetry {
        /// Host name
        host: String,
        /// Attempts made so far
        attempts: u32,
        /// Retry limit
        max_retries: u32,
    },
    /// An event kind this crate does not model.
    #[serde(skip)]
    Unhandled {
        /// The producer's tag for the event
        tag: String,
    },
}

impl Event {
    /// Tags of every modelled variant, as they appear on the wire.
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "PlaybookStart",
        "PlaybookEnd",
        "PlayStart",
        "TaskStart",
        "HandlerTaskStart",
        "RunnerOK",
        "RunnerItemOK",
        "RunnerSkipped",
        "RunnerFailed",
        "RunnerItemFailed",
        "RunnerUnreachable",
        "RunnerItemRetry",
    ];

    /// The variant tag, used when reporting events we cannot render.
    pub fn tag(&self) -> &str {
        match self {
            Event::PlaybookStart { .. } => "PlaybookStart",
            Event::PlaybookEnd => "PlaybookEnd",
            Event::PlayStart { .. } => "PlayStart",
            Event::TaskStart { .. } => "TaskStart",
            Event::HandlerTaskStart { .. } => "HandlerTaskStart",
            Event::RunnerOk { .. } => "RunnerOK",
            Event::RunnerItemOk { .. } => "RunnerItemOK",
            Event::RunnerSkipped { .. } => "RunnerSkipped",
            Event::RunnerFailed(_) => "RunnerFailed",
            Event::RunnerItemFailed(_) => "RunnerItemFailed",
            Event::RunnerUnreachable { .. } => "RunnerUnreachable",
            Event::RunnerItemRetry { .. } => "RunnerItemRetry",
            Event::Unhandled { tag } => tag,
        }
    }

    /// Returns true for events that open or close a play.
    pub fn is_play_boundary(&self) -> bool {
        matches!(self, Event::PlayStart { .. } | Event::PlaybookEnd)
    }

    pub fn playbook_start(play_count: u32) -> Self {
        Event::PlaybookStart { play_count }
    }

    pub fn play_start(name: impl Into<String>) -> Self {
        Event::PlayStart { name: name.into() }
    }

    pub fn task_start(name: impl Into<String>) -> Self {
        Event::TaskStart { name: name.into() }
    }

    pub fn handler_task_start(name: impl Into<String>) -> Self {
        Event::HandlerTaskStart { name: name.into() }
    }

    pub fn runner_ok(host: impl Into<String>) -> Self {
        Event::RunnerOk { host: host.into() }
    }

    pub fn runner_item_ok(host: impl Into<String>, item: Option<&str>) -> Self {
        Event::RunnerItemOk {
            host: host.into(),
            item: item.map(str::to_string),
        }
    }

    pub fn runner_skipped(host: impl Into<String>) -> Self {
        Event::RunnerSkipped { host: host.into() }
    }

    pub fn runner_unreachable(host: impl Into<String>) -> Self {
        Event::RunnerUnreachable { host: host.into() }
    }

    pub fn runner_item_retry(host: impl Into<String>, attempts: u32, max_retries: u32) -> Self {
        Event::RunnerItemRetry {
            host: host.into(),
            attempts,
            max_retries,
        }
    }

    pub fn unhandled(tag: impl Into<String>) -> Self {
        Event::Unhandled { tag: tag.into() }
    }
}

/// Producers report absent optional text as an empty string as often as they
/// omit it; both mean "nothing to show".
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_matches_wire_name() {
        let event = Event::runner_ok("web1");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.tag());
        assert_eq!(json["host"], "web1");
    }

    #[test]
    fn test_every_known_tag_has_a_variant() {
        let samples = [
            Event::playbook_start(1),
            Event::PlaybookEnd,
            Event::play_start("p"),
            Event::task_start("t"),
            Event::handler_task_start("h"),
            Event::runner_ok("h"),
            Event::runner_item_ok("h", None),
            Event::runner_skipped("h"),
            Event::RunnerFailed(Failure::new("h", "m")),
            Event::RunnerItemFailed(Failure::new("h", "m")),
            Event::runner_unreachable("h"),
            Event::runner_item_retry("h", 1, 3),
        ];
        let tags: Vec<&str> = samples.iter().map(Event::tag).collect();
        assert_eq!(tags, Event::KNOWN_TAGS);
    }

    #[test]
    fn test_failure_deserializes_with_defaults() {
        let event: Event =
            serde_json::from_str(r#"{"type":"RunnerFailed","host":"db1","message":"boom"}"#)
                .unwrap();
        match event {
            Event::RunnerFailed(failure) => {
                assert_eq!(failure.host, "db1");
                assert_eq!(failure.message, "boom");
                assert!(!failure.ignore_errors);
                assert_eq!(failure.stdout(), None);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_empty_optional_text_counts_as_absent() {
        let failure = Failure::new("h", "m").with_stdout("").with_stderr("trace");
        assert_eq!(failure.stdout(), None);
        assert_eq!(failure.stderr(), Some("trace"));
        assert_eq!(Failure::new("h", "m").with_item("").item(), None);
    }

    #[test]
    fn test_unhandled_reports_its_own_tag() {
        assert_eq!(Event::unhandled("RunnerAsyncPoll").tag(), "RunnerAsyncPoll");
        assert!(!Event::unhandled("X").is_play_boundary());
        assert!(Event::PlaybookEnd.is_play_boundary());
    }
}
