//! Stream lifecycle state machine
//!
//! Tracks one broadcast stream from creation through teardown. The scheduler
//! owns every stream exclusively; nothing here is shared across tasks.

use crate::container::FrameCursor;
use crate::transport::StreamId;

/// Stream lifecycle phase
///
/// ```text
/// Idle ──started──▶ Started ──first send──▶ Streaming ──┐
///                      │                      │  ▲      │ sent
///                      │ stop / error         │  └──────┘
///                      ▼                      ▼
///                   Stopping ◀────────────────┘
///                      │
///                      ▼ stopped
///                   Stopped
/// ```
///
/// A frame is never submitted before `Started` is observed, and a stream in
/// `Stopping` ignores further production triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// Created, transport channel not yet active
    Idle,
    /// Transport confirmed the channel is active; nothing sent yet
    Started,
    /// Steady-state frame production
    Streaming,
    /// Stop requested or channel failed; waiting for teardown confirmation
    Stopping,
    /// Transport confirmed teardown
    Stopped,
}

/// One broadcast channel's state
#[derive(Debug)]
pub struct BroadcastStream {
    /// Stream id (index into the source's stream table)
    pub id: StreamId,

    /// Cursor into this stream's container window
    cursor: FrameCursor,

    /// Sequence number for the next submission; wraps at the transport's
    /// numeric width
    seq_num: u16,

    /// Frames sent since the stream started
    sent_cnt: u64,

    /// Payload bytes sent since the stream started
    bytes_sent: u64,

    /// Times the cursor wrapped back to the first frame
    loop_cnt: u64,

    /// Whether the transport rejected a submission on this stream
    rejected: bool,

    /// Current lifecycle phase
    phase: StreamPhase,
}

impl BroadcastStream {
    /// Create a stream in the `Idle` phase
    pub fn new(id: StreamId, cursor: FrameCursor) -> Self {
        Self {
            id,
            cursor,
            seq_num: 0,
            sent_cnt: 0,
            bytes_sent: 0,
            loop_cnt: 0,
            rejected: false,
            phase: StreamPhase::Idle,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Transport confirmed the channel is active
    ///
    /// Resets the sequence number and sent count so a restarted stream
    /// begins from zero.
    pub fn on_started(&mut self) {
        if self.phase == StreamPhase::Idle {
            self.phase = StreamPhase::Started;
            self.seq_num = 0;
            self.sent_cnt = 0;
            self.bytes_sent = 0;
        }
    }

    /// First frame accepted by the transport
    pub fn on_first_submission(&mut self) {
        if self.phase == StreamPhase::Started {
            self.phase = StreamPhase::Streaming;
        }
    }

    /// Stop requested or the channel hit a terminal error
    ///
    /// Production for this stream ends permanently; notifications that
    /// arrive afterwards are ignored by the scheduler.
    pub fn begin_stop(&mut self) {
        if matches!(self.phase, StreamPhase::Started | StreamPhase::Streaming) {
            self.phase = StreamPhase::Stopping;
        }
    }

    /// Transport confirmed teardown
    pub fn on_stopped(&mut self) {
        self.phase = StreamPhase::Stopped;
    }

    /// Whether the stream may produce frames
    pub fn is_active(&self) -> bool {
        matches!(self.phase, StreamPhase::Started | StreamPhase::Streaming)
    }

    /// Sequence number for the next submission
    pub fn seq_num(&self) -> u16 {
        self.seq_num
    }

    /// Record a successful submission of `bytes` payload bytes: advances the
    /// sequence number and the sent counters, and returns the new frame total
    pub fn record_sent(&mut self, bytes: usize) -> u64 {
        self.seq_num = self.seq_num.wrapping_add(1);
        self.sent_cnt += 1;
        self.bytes_sent += bytes as u64;
        self.on_first_submission();
        self.sent_cnt
    }

    /// Record a transport rejection on this stream
    pub fn mark_rejected(&mut self) {
        self.rejected = true;
    }

    /// Whether the transport rejected a submission on this stream
    pub fn was_rejected(&self) -> bool {
        self.rejected
    }

    /// Record a cursor wrap
    pub fn record_loop(&mut self) -> u64 {
        self.loop_cnt += 1;
        self.loop_cnt
    }

    /// Frames sent since the stream started
    pub fn sent_count(&self) -> u64 {
        self.sent_cnt
    }

    /// Payload bytes sent since the stream started
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Times the container looped
    pub fn loop_count(&self) -> u64 {
        self.loop_cnt
    }

    /// Cursor into this stream's container window
    pub fn cursor(&self) -> &FrameCursor {
        &self.cursor
    }

    /// Mutable cursor access for frame production
    pub fn cursor_mut(&mut self) -> &mut FrameCursor {
        &mut self.cursor
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::container::{ContainerBuilder, FrameCursor, HEADER_SIZE};

    fn stream() -> BroadcastStream {
        let data: Bytes = ContainerBuilder::new(16_000, 10_000, 1)
            .frame(&[0xAA; 4])
            .build();
        let end = data.len();
        BroadcastStream::new(0, FrameCursor::new(data, HEADER_SIZE, end))
    }

    #[test]
    fn test_lifecycle() {
        let mut s = stream();
        assert_eq!(s.phase(), StreamPhase::Idle);
        assert!(!s.is_active());

        s.on_started();
        assert_eq!(s.phase(), StreamPhase::Started);
        assert!(s.is_active());

        s.record_sent(4);
        assert_eq!(s.phase(), StreamPhase::Streaming);

        s.begin_stop();
        assert_eq!(s.phase(), StreamPhase::Stopping);
        assert!(!s.is_active());

        s.on_stopped();
        assert_eq!(s.phase(), StreamPhase::Stopped);
    }

    #[test]
    fn test_no_streaming_before_started() {
        let mut s = stream();

        // A first-submission mark in Idle must not skip Started
        s.on_first_submission();
        assert_eq!(s.phase(), StreamPhase::Idle);
    }

    #[test]
    fn test_started_resets_counters() {
        let mut s = stream();
        s.on_started();
        s.record_sent(4);
        s.record_sent(4);
        assert_eq!(s.seq_num(), 2);
        assert_eq!(s.sent_count(), 2);

        s.begin_stop();
        s.on_stopped();

        // A fresh start begins from zero again
        s.phase = StreamPhase::Idle;
        s.on_started();
        assert_eq!(s.seq_num(), 0);
        assert_eq!(s.sent_count(), 0);
    }

    #[test]
    fn test_seq_num_wraps() {
        let mut s = stream();
        s.on_started();
        s.seq_num = u16::MAX;

        assert_eq!(s.seq_num(), u16::MAX);
        s.record_sent(4);
        assert_eq!(s.seq_num(), 0);
    }

    #[test]
    fn test_begin_stop_from_started() {
        let mut s = stream();
        s.on_started();
        s.begin_stop();
        assert_eq!(s.phase(), StreamPhase::Stopping);
    }

    #[test]
    fn test_begin_stop_ignored_when_idle() {
        let mut s = stream();
        s.begin_stop();
        assert_eq!(s.phase(), StreamPhase::Idle);
    }
}
