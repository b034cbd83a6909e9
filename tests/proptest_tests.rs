//! Property-based tests for the explainers and padding.
//!
//! Random playbooks are built from well-formed plays (a `PlayStart` followed
//! by arbitrary task and runner events) and always end with `PlaybookEnd`.

use proptest::prelude::*;

use playlens::event::{Event, Failure};
use playlens::explain::{self, EventExplainer, Mode};
use playlens::pad::{pad_right, play_count_indicator};
use playlens::style::Styler;
use playlens::writer::RecordingWriter;

// ============================================================================
// Strategies
// ============================================================================

fn host() -> impl Strategy<Value = String> {
    "h[0-9]"
}

fn failure() -> impl Strategy<Value = Failure> {
    (
        host(),
        "[a-z ]{0,12}",
        any::<bool>(),
        proptest::option::of("[a-z\n]{0,8}"),
    )
        .prop_map(|(host, message, ignore, stdout)| {
            let mut failure = Failure::new(host, message);
            failure.ignore_errors = ignore;
            failure.stdout = stdout;
            failure
        })
}

fn body_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "t[a-z]{1,6}".prop_map(|name| Event::task_start(name)),
        "r[a-z]{1,6}".prop_map(|name| Event::handler_task_start(name)),
        host().prop_map(|h| Event::runner_ok(h)),
        (host(), proptest::option::of("[a-z]{0,4}"))
            .prop_map(|(h, item)| Event::runner_item_ok(h, item.as_deref())),
        host().prop_map(|h| Event::runner_skipped(h)),
        host().prop_map(|h| Event::runner_unreachable(h)),
        (host(), 1u32..5, 1u32..5).prop_map(|(h, a, m)| Event::runner_item_retry(h, a, m)),
        failure().prop_map(Event::RunnerFailed),
        (failure(), "[a-z]{0,4}").prop_map(|(f, item)| Event::RunnerItemFailed(f.with_item(item))),
        "[A-Z][a-z]{2,8}".prop_map(|tag| Event::unhandled(tag)),
    ]
}

/// A playbook of `k` plays, returned with `k`.
fn playbook() -> impl Strategy<Value = (usize, Vec<Event>)> {
    prop::collection::vec(prop::collection::vec(body_event(), 0..10), 1..5).prop_map(|plays| {
        let k = plays.len();
        let mut events = vec![Event::playbook_start(k as u32)];
        for (i, body) in plays.into_iter().enumerate() {
            events.push(Event::play_start(format!("play{i}")));
            events.extend(body);
        }
        events.push(Event::PlaybookEnd);
        (k, events)
    })
}

fn render(mode: Mode, styler: Styler, events: &[Event]) -> RecordingWriter {
    let writer = RecordingWriter::new();
    let mut explainer = explain::for_mode(mode, writer.clone(), styler);
    for event in events {
        explainer.explain(event).unwrap();
    }
    explainer.close().unwrap();
    writer
}

/// Durable lines that report a play's outcome, per play index.
fn status_lines_per_play(k: usize, durable: &[String]) -> Vec<usize> {
    (0..k)
        .map(|i| {
            let header = format!("{} play{i}", play_count_indicator(i as u32 + 1, k as u32));
            let ok = format!("[OK] {header}");
            let err = format!("[ERR] {header}");
            durable.iter().filter(|l| **l == ok || **l == err).count()
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every play gets exactly one status line, so there are never more than k
    #[test]
    fn test_one_status_line_per_play((k, events) in playbook()) {
        let writer = render(Mode::Updating, Styler::plain(), &events);
        let counts = status_lines_per_play(k, &writer.durable_lines());

        prop_assert_eq!(counts.iter().sum::<usize>(), k);
        prop_assert!(counts.iter().all(|&n| n == 1), "per-play counts: {:?}", counts);
    }

    /// A real failure hides every later handler in the same play
    #[test]
    fn test_handlers_suppressed_after_failure(
        before in prop::collection::vec(body_event(), 0..6),
        after in prop::collection::vec(body_event(), 0..6),
        host in host(),
    ) {
        let mut events = vec![Event::playbook_start(1), Event::play_start("P")];
        events.extend(before);
        events.push(Event::RunnerFailed(Failure::new(host, "boom")));
        events.extend(after);
        events.push(Event::handler_task_start("ZZhandler"));

        let writer = render(Mode::Updating, Styler::plain(), &events);
        prop_assert!(writer.frames().iter().all(|f| !f.contains("ZZhandler")));
        prop_assert!(!writer.durable().contains("ZZhandler"));
    }

    /// Padding always yields exactly the requested width
    #[test]
    fn test_pad_right_has_exact_width(s in "\\PC{0,20}", pad in "\\PC{0,3}", width in 0usize..40) {
        prop_assert_eq!(pad_right(&s, &pad, width).chars().count(), width);
    }

    /// Retries leave no trace in verbose output
    #[test]
    fn test_verbose_ignores_retries((_k, events) in playbook()) {
        let without: Vec<Event> = events
            .iter()
            .filter(|e| !matches!(e, Event::RunnerItemRetry { .. }))
            .cloned()
            .collect();

        let with_retries = render(Mode::Verbose, Styler::plain(), &events);
        let without_retries = render(Mode::Verbose, Styler::plain(), &without);
        prop_assert_eq!(with_retries.durable(), without_retries.durable());
        prop_assert!(!with_retries.durable().contains("Retrying"));
    }

    /// Identical streams render identically, in every mode and with color
    #[test]
    fn test_rendering_is_deterministic((_k, events) in playbook(), ansi in any::<bool>()) {
        for mode in [Mode::Updating, Mode::Verbose, Mode::Plain] {
            let first = render(mode, Styler::new(ansi), &events);
            let second = render(mode, Styler::new(ansi), &events);
            prop_assert_eq!(first.recording(), second.recording());
        }
    }
}
