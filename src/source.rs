//! Event sources.
//!
//! An [`EventSource`] is a lazy, finite, non-restartable sequence of events
//! from a single producer. `None` means the producer finished cleanly; an
//! `Err` item means it ended abnormally and no further events follow.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::{Error, Result};
use crate::event::Event;

/// Producer of playbook events.
#[async_trait]
pub trait EventSource: Send {
    /// Waits for the next event.
    async fn next_event(&mut self) -> Option<Result<Event>>;
}

// ============================================================================
// Channel Source
// ============================================================================

/// Sending half of a bounded event queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Result<Event>>,
}

impl EventSender {
    /// Queues an event, waiting while the queue is full.
    ///
    /// Fails with [`Error::Closed`] once the receiving side is gone.
    pub async fn send(&self, event: Event) -> Result<()> {
        self.tx.send(Ok(event)).await.map_err(|_| Error::Closed)
    }

    /// Ends the stream abnormally with `err`.
    pub async fn fail(&self, err: Error) -> Result<()> {
        self.tx.send(Err(err)).await.map_err(|_| Error::Closed)
    }

    /// Whether the receiving side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half of a bounded event queue.
///
/// The stream ends once every [`EventSender`] has been dropped.
#[derive(Debug)]
pub struct ChannelSource {
    rx: ReceiverStream<Result<Event>>,
}

impl ChannelSource {
    /// Stops accepting events. Anything already queued is still delivered.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn next_event(&mut self) -> Option<Result<Event>> {
        self.rx.next().await
    }
}

/// Creates a bounded, ordered event queue.
pub fn channel(capacity: usize) -> (EventSender, ChannelSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        EventSender { tx },
        ChannelSource {
            rx: ReceiverStream::new(rx),
        },
    )
}

// ============================================================================
// Stream Source
// ============================================================================

/// Adapts any stream of events into an [`EventSource`].
#[derive(Debug)]
pub struct StreamSource<S> {
    inner: S,
}

impl<S> StreamSource<S>
where
    S: Stream<Item = Result<Event>> + Unpin + Send,
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S> EventSource for StreamSource<S>
where
    S: Stream<Item = Result<Event>> + Unpin + Send,
{
    async fn next_event(&mut self) -> Option<Result<Event>> {
        self.inner.next().await
    }
}

/// A source that yields `events` and then finishes cleanly.
pub fn from_events<I>(events: I) -> StreamSource<stream::Iter<std::vec::IntoIter<Result<Event>>>>
where
    I: IntoIterator<Item = Event>,
{
    let items: Vec<Result<Event>> = events.into_iter().map(Ok).collect();
    StreamSource::new(stream::iter(items))
}
