//! Stream driver tests: normal completion, source and sink failures,
//! cancellation, and producer/consumer hand-off over the bounded channel.

use std::time::Duration;

use playlens::driver::{RunSummary, StreamDriver};
use playlens::error::Error;
use playlens::event::{Event, Failure};
use playlens::explain::{self, Mode};
use playlens::replay::ReplaySource;
use playlens::source;
use playlens::style::Styler;
use playlens::writer::RecordingWriter;
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn driver(mode: Mode, writer: &RecordingWriter) -> StreamDriver<explain::BoxedExplainer> {
    StreamDriver::new(explain::for_mode(mode, writer.clone(), Styler::plain()))
}

#[tokio::test]
async fn test_producer_task_feeds_explainer_in_order() {
    let writer = RecordingWriter::new();
    let (tx, rx) = source::channel(1);

    let producer = tokio::spawn(async move {
        tx.send(Event::playbook_start(3)).await?;
        for i in 0..3 {
            tx.send(Event::play_start(format!("play{i}"))).await?;
            tx.send(Event::task_start("T")).await?;
            tx.send(Event::runner_ok("h1")).await?;
        }
        tx.send(Event::PlaybookEnd).await
    });

    let summary = driver(Mode::Updating, &writer).run(rx).await.unwrap();
    producer.await.unwrap().unwrap();

    assert_eq!(
        summary,
        RunSummary {
            events: 11,
            cancelled: false
        }
    );
    assert_eq!(
        writer.durable_lines(),
        vec![
            "[OK] 1/3.... play0",
            "[OK] 2/3.... play1",
            "[OK] 3/3.... play2",
        ]
    );
    assert!(writer.is_closed());
}

#[tokio::test]
async fn test_source_error_surfaces_unchanged() {
    let writer = RecordingWriter::new();
    let (tx, rx) = source::channel(4);
    tx.send(Event::playbook_start(1)).await.unwrap();
    tx.send(Event::play_start("P")).await.unwrap();
    tx.fail(Error::from_source("connection to runner lost"))
        .await
        .unwrap();
    drop(tx);

    let err = driver(Mode::Updating, &writer).run(rx).await.unwrap_err();

    assert!(matches!(err, Error::Source(_)));
    assert_eq!(
        err.to_string(),
        "Event source failed: connection to runner lost"
    );
    // The partial frame is still flushed on the way out
    assert!(writer.is_closed());
    assert_eq!(writer.durable(), "1/1.... P\n");
}

#[tokio::test]
async fn test_sink_failure_stops_run_and_closes() {
    let writer = RecordingWriter::failing_after(1);
    let events = vec![
        Event::playbook_start(1),
        Event::play_start("P"),
        Event::task_start("T"),
        Event::RunnerFailed(Failure::new("h1", "boom")),
        Event::PlaybookEnd,
    ];

    let err = driver(Mode::Updating, &writer)
        .run(source::from_events(events))
        .await
        .unwrap_err();

    assert!(err.is_sink_failure());
    assert!(matches!(err, Error::Io(_)));
    assert!(writer.is_closed());
}

#[tokio::test]
async fn test_cancellation_flushes_partial_frame() {
    let writer = RecordingWriter::new();
    let (tx, rx) = source::channel(8);
    tx.send(Event::playbook_start(1)).await.unwrap();
    tx.send(Event::play_start("P")).await.unwrap();
    tx.send(Event::task_start("T")).await.unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    // The sender stays alive, so only cancellation can end this run
    let summary = driver(Mode::Updating, &writer)
        .with_cancellation(token)
        .run(rx)
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.events, 3);
    assert!(writer.is_closed());
    assert_eq!(writer.durable(), "1/1.... P\n- Task: T\n");
    assert!(tx.is_closed());
}

#[tokio::test]
async fn test_replay_error_reports_line() {
    let writer = RecordingWriter::new();
    let input = "{\"type\":\"PlaybookStart\",\"play_count\":1}\n{\"type\":\"PlayStart\"}\n";

    let err = driver(Mode::Verbose, &writer)
        .run(ReplaySource::new(input.as_bytes()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Replay { line: 2, .. }));
    assert_eq!(err.exit_code(), 4);
    assert!(writer.is_closed());
}

#[tokio::test]
async fn test_replay_runs_to_completion() {
    let writer = RecordingWriter::new();
    let input = r#"{"type":"PlaybookStart","play_count":1}
{"type":"PlayStart","name":"Prep"}
{"type":"TaskStart","name":"ping"}
{"type":"RunnerOK","host":"node1"}
{"type":"RunnerAsyncPoll","host":"node1"}

{"type":"PlaybookEnd"}
"#;

    let summary = driver(Mode::Verbose, &writer)
        .run(ReplaySource::new(input.as_bytes()))
        .await
        .unwrap();

    assert_eq!(summary.events, 6);
    assert_eq!(
        writer.durable(),
        "1/1....  Prep\n\
         - Running task: ping\n\
         [OK]   node1\n\
         Unhandled event: RunnerAsyncPoll\n\
         1/1.... Prep Finished\n"
    );
}

#[tokio::test]
async fn test_empty_source() {
    let writer = RecordingWriter::new();
    let summary = driver(Mode::Plain, &writer)
        .run(source::from_events(Vec::new()))
        .await
        .unwrap();

    assert_eq!(summary, RunSummary::default());
    assert_eq!(writer.durable(), "");
    assert!(writer.is_closed());
}
