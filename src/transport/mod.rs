//! Transport seam
//!
//! The broadcast source never talks to a radio directly. It submits filled
//! transmit buffers through the [`Transport`] trait and reacts to the three
//! notifications a transport delivers per stream: started, stopped, and sent.
//!
//! Notifications are pushed through an [`EventSender`] (or a per-stream
//! [`StreamNotifier`]) from whatever context the transport runs its
//! completions in; the scheduler consumes them on its own task. Transport
//! setup and teardown (advertising, session parameters, encryption) are the
//! embedder's business and never appear here.

use tokio::sync::mpsc;

use crate::pool::TxBuffer;

/// Index of a stream within its broadcast source
pub type StreamId = usize;

/// Error returned when the transport rejects a submission
///
/// A rejection permanently ends production on the affected stream; it is
/// never retried and never escalates past that stream.
#[derive(Debug, Clone)]
pub struct SubmitError {
    /// Transport-specific reason
    pub reason: String,
}

impl SubmitError {
    /// Create a rejection with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Submission rejected: {}", self.reason)
    }
}

impl std::error::Error for SubmitError {}

/// Outbound frame sink implemented by the transport layer
pub trait Transport: Send + Sync {
    /// Submit one frame for transmission on `stream_id`, tagged with
    /// `seq_num`
    ///
    /// On `Ok` the transport owns the buffer until the send completes; it
    /// drops the buffer (returning it to the pool) and then notifies `sent`
    /// for the stream. On `Err` the transport must have already dropped the
    /// buffer.
    fn submit(
        &self,
        stream_id: StreamId,
        buf: TxBuffer,
        seq_num: u16,
    ) -> impl std::future::Future<Output = Result<(), SubmitError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn submit(
        &self,
        stream_id: StreamId,
        buf: TxBuffer,
        seq_num: u16,
    ) -> impl std::future::Future<Output = Result<(), SubmitError>> + Send {
        (**self).submit(stream_id, buf, seq_num)
    }
}

/// Per-stream notification delivered by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// The channel is active; the stream may produce
    Started,
    /// The channel was torn down, with the transport's reason code
    Stopped {
        /// Transport-specific teardown reason
        reason: u8,
    },
    /// A previously submitted frame finished sending
    Sent,
}

/// Handle for pushing stream notifications into the scheduler
///
/// Clone freely; senders are cheap and any context may deliver events.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<(StreamId, StreamEvent)>,
}

impl EventSender {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<(StreamId, StreamEvent)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver an event for `stream_id`
    ///
    /// Events sent after the scheduler has shut down are dropped.
    pub fn send(&self, stream_id: StreamId, event: StreamEvent) {
        let _ = self.tx.send((stream_id, event));
    }

    /// Notify that `stream_id`'s channel is active
    pub fn started(&self, stream_id: StreamId) {
        self.send(stream_id, StreamEvent::Started);
    }

    /// Notify that `stream_id`'s channel was torn down
    pub fn stopped(&self, stream_id: StreamId, reason: u8) {
        self.send(stream_id, StreamEvent::Stopped { reason });
    }

    /// Notify that a frame on `stream_id` finished sending
    pub fn sent(&self, stream_id: StreamId) {
        self.send(stream_id, StreamEvent::Sent);
    }

    /// Bind the sender to one stream
    pub fn stream(&self, stream_id: StreamId) -> StreamNotifier {
        StreamNotifier {
            stream_id,
            events: self.clone(),
        }
    }
}

/// Notification handle bound to a single stream
///
/// What a transport integration registers per channel: the capability set
/// {started, stopped, sent} with the stream id baked in.
#[derive(Debug, Clone)]
pub struct StreamNotifier {
    stream_id: StreamId,
    events: EventSender,
}

impl StreamNotifier {
    /// The stream this notifier is bound to
    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Notify that the channel is active
    pub fn started(&self) {
        self.events.started(self.stream_id);
    }

    /// Notify that the channel was torn down
    pub fn stopped(&self, reason: u8) {
        self.events.stopped(self.stream_id, reason);
    }

    /// Notify that a frame finished sending
    pub fn sent(&self) {
        self.events.sent(self.stream_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_delivery() {
        let (events, mut rx) = EventSender::channel();

        events.started(0);
        events.sent(1);
        events.stopped(2, 0x13);

        assert_eq!(rx.recv().await, Some((0, StreamEvent::Started)));
        assert_eq!(rx.recv().await, Some((1, StreamEvent::Sent)));
        assert_eq!(rx.recv().await, Some((2, StreamEvent::Stopped { reason: 0x13 })));
    }

    #[tokio::test]
    async fn test_stream_notifier_binds_id() {
        let (events, mut rx) = EventSender::channel();
        let notifier = events.stream(7);

        notifier.started();
        notifier.sent();

        assert_eq!(rx.recv().await, Some((7, StreamEvent::Started)));
        assert_eq!(rx.recv().await, Some((7, StreamEvent::Sent)));
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (events, rx) = EventSender::channel();
        drop(rx);

        // Must not panic
        events.sent(0);
    }
}
