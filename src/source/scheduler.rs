//! Broadcast source and frame scheduler
//!
//! The scheduler keeps every non-stopped stream's outbound queue as full as
//! the transport allows. It is purely reactive: after an initial burst of
//! `enqueue_depth` frames per stream, every new frame is produced in response
//! to that stream's own send-completion notification, so the in-flight count
//! per stream never exceeds the configured depth.
//!
//! ```text
//!                 BroadcastSource::run()
//!         ┌────────────────────────────────────┐
//!  events │  recv ─▶ match ─▶ produce(stream)  │
//! ───────▶│            │         │             │
//!         │         Stopped   acquire buffer   │──▶ Transport::submit
//!         │            │      read frame       │
//!         │        Countdown  copy + submit    │
//!         └────────────────────────────────────┘
//! ```
//!
//! Startup blocks until every stream has reported started; teardown is gated
//! on every stream reporting stopped. Both waits are counting latches shared
//! with the [`SourceHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::container::{FrameCursor, Lc3Header, HEADER_SIZE};
use crate::pool::TxBufferPool;
use crate::stats::{SourceStats, StreamStats};
use crate::stream::{BroadcastStream, StreamPhase};
use crate::sync::Countdown;
use crate::transport::{EventSender, StreamEvent, StreamId, StreamNotifier, Transport};

use super::config::SourceConfig;
use super::error::SourceError;

/// Control and notification handle for a running broadcast source
///
/// Cheap to clone. The transport integration uses it to deliver stream
/// notifications; the embedder uses it to request a stop and to await the
/// startup/teardown barriers.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    events: EventSender,
    stopping: Arc<AtomicBool>,
    started: Arc<Countdown>,
    stopped: Arc<Countdown>,
    lifetime: Option<Duration>,
}

impl SourceHandle {
    /// Event sender for transport notifications
    pub fn events(&self) -> &EventSender {
        &self.events
    }

    /// Notification handle bound to one stream
    pub fn notifier(&self, stream_id: StreamId) -> StreamNotifier {
        self.events.stream(stream_id)
    }

    /// Request a stop: every production cycle from now on is a no-op
    ///
    /// Streams still transition to `Stopped` individually as the transport
    /// confirms teardown; await [`SourceHandle::wait_stopped`] to gate the
    /// release of shared resources.
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Relaxed)
    }

    /// Wait until every stream has reported started
    pub async fn wait_started(&self) {
        self.started.wait().await;
    }

    /// Whether every stream has reported started
    pub fn is_started(&self) -> bool {
        self.started.is_released()
    }

    /// Wait until every stream has reported stopped
    pub async fn wait_stopped(&self) {
        self.stopped.wait().await;
    }

    /// Whether every stream has reported stopped
    pub fn is_stopped(&self) -> bool {
        self.stopped.is_released()
    }

    /// Advisory broadcast lifetime from the configuration
    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }
}

/// A multi-stream broadcast source
///
/// Owns the streams, the transmit buffer pool and the transport, and drives
/// frame production from transport notifications. Created from a validated
/// [`SourceConfig`]; consumed by [`BroadcastSource::run`].
pub struct BroadcastSource<T> {
    transport: T,
    streams: Vec<BroadcastStream>,
    pool: TxBufferPool,
    enqueue_depth: usize,
    lifetime: Option<Duration>,
    events: Option<EventSender>,
    events_rx: mpsc::UnboundedReceiver<(StreamId, StreamEvent)>,
    stopping: Arc<AtomicBool>,
    started: Arc<Countdown>,
    stopped: Arc<Countdown>,
}

impl<T: Transport> BroadcastSource<T> {
    /// Build a source from its configuration
    ///
    /// Parses every stream's container header, derives the stream's frame
    /// window by walking the length prefixes (so a malformed container fails
    /// here, not mid-broadcast), and sizes the transmit buffer pool.
    pub fn new(config: SourceConfig, transport: T) -> Result<Self, SourceError> {
        config.validate()?;

        let mut streams = Vec::with_capacity(config.streams.len());
        let mut buffer_size = 0usize;

        for (id, sc) in config.streams.iter().enumerate() {
            let header = Lc3Header::parse(&sc.container)
                .map_err(|source| SourceError::Container { stream: id, source })?;

            let srate_hz = u32::from(header.srate_100hz) * 100;
            let frame_us = u32::from(header.frame_10us) * 10;
            let frame_count = header.sample_count() / sc.samples_per_frame;
            if frame_count == 0 {
                return Err(SourceError::EmptyStream { stream: id });
            }

            let end = FrameCursor::scan(&sc.container, HEADER_SIZE, frame_count)
                .map_err(|source| SourceError::Container { stream: id, source })?;

            tracing::info!(
                stream = id,
                srate_hz,
                frame_us,
                channels = header.channels,
                samples = header.sample_count(),
                frames = frame_count,
                "Stream container ready"
            );

            let cursor = FrameCursor::new(sc.container.clone(), HEADER_SIZE, end);
            streams.push(BroadcastStream::new(id, cursor));
            buffer_size = buffer_size.max(sc.sdu_size);
        }

        let pool = TxBufferPool::new(config.effective_pool_capacity(), buffer_size);
        let (events, events_rx) = EventSender::channel();
        let stream_count = streams.len();

        Ok(Self {
            transport,
            streams,
            pool,
            enqueue_depth: config.enqueue_depth,
            lifetime: config.lifetime,
            events: Some(events),
            events_rx,
            stopping: Arc::new(AtomicBool::new(false)),
            started: Arc::new(Countdown::new(stream_count)),
            stopped: Arc::new(Countdown::new(stream_count)),
        })
    }

    /// Control/notification handle; clone as many as needed before `run`
    pub fn handle(&self) -> SourceHandle {
        SourceHandle {
            events: self.events.clone().expect("handle() after run()"),
            stopping: Arc::clone(&self.stopping),
            started: Arc::clone(&self.started),
            stopped: Arc::clone(&self.stopped),
            lifetime: self.lifetime,
        }
    }

    /// Number of configured streams
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Frames kept in flight per stream
    pub fn enqueue_depth(&self) -> usize {
        self.enqueue_depth
    }

    /// The shared transmit buffer pool
    pub fn pool(&self) -> &TxBufferPool {
        &self.pool
    }

    /// Drive the source until every stream has stopped
    ///
    /// Blocks until all streams report started, bursts `enqueue_depth`
    /// frames per stream to fill the transport queue, then produces one
    /// frame per send-completion notification. Returns the final counters.
    pub async fn run(mut self) -> SourceStats {
        let begun = Instant::now();

        // From here on only external handles keep the event channel open, so
        // a fully abandoned source shuts down instead of waiting forever.
        self.events = None;

        while !self.started.is_released() && self.stopped.remaining() > 0 {
            match self.events_rx.recv().await {
                Some((id, event)) => self.handle_startup_event(id, event),
                None => {
                    tracing::warn!("All notification handles dropped before startup completed");
                    return self.finish(begun);
                }
            }
        }

        if self.stopped.remaining() > 0 {
            tracing::info!(
                streams = self.streams.len(),
                depth = self.enqueue_depth,
                "Broadcast source started; filling transport queue"
            );
            for id in 0..self.streams.len() {
                for _ in 0..self.enqueue_depth {
                    self.produce(id).await;
                }
            }
        }

        while self.stopped.remaining() > 0 {
            match self.events_rx.recv().await {
                Some((id, StreamEvent::Sent)) => self.produce(id).await,
                Some((id, StreamEvent::Stopped { reason })) => {
                    self.handle_stream_stopped(id, reason)
                }
                Some((id, StreamEvent::Started)) => {
                    tracing::warn!(stream = id, "Unexpected started notification");
                }
                None => {
                    tracing::warn!("All notification handles dropped; abandoning streams");
                    break;
                }
            }
        }

        self.finish(begun)
    }

    /// Handle one notification while waiting for all streams to start
    fn handle_startup_event(&mut self, id: StreamId, event: StreamEvent) {
        let Some(stream) = self.streams.get_mut(id) else {
            tracing::warn!(stream = id, "Notification for unknown stream");
            return;
        };

        match event {
            StreamEvent::Started => {
                if stream.phase() == StreamPhase::Idle {
                    stream.on_started();
                    self.started.tick();
                    tracing::debug!(stream = id, "Stream started");
                } else {
                    tracing::warn!(stream = id, "Duplicate started notification");
                }
            }
            StreamEvent::Stopped { reason } => {
                if stream.phase() == StreamPhase::Stopped {
                    tracing::warn!(stream = id, "Duplicate stopped notification");
                    return;
                }
                let never_started = stream.phase() == StreamPhase::Idle;
                stream.begin_stop();
                stream.on_stopped();
                if never_started {
                    // Keep the startup barrier from waiting on a dead stream.
                    self.started.tick();
                }
                self.stopped.tick();
                tracing::warn!(stream = id, reason, "Stream stopped during startup");
            }
            StreamEvent::Sent => {
                tracing::warn!(stream = id, "Sent notification before startup completed");
            }
        }
    }

    /// Steady-state handling of a stopped notification
    fn handle_stream_stopped(&mut self, id: StreamId, reason: u8) {
        let Some(stream) = self.streams.get_mut(id) else {
            tracing::warn!(stream = id, "Notification for unknown stream");
            return;
        };

        if stream.phase() == StreamPhase::Stopped {
            tracing::warn!(stream = id, "Duplicate stopped notification");
            return;
        }

        stream.begin_stop();
        stream.on_stopped();
        self.stopped.tick();
        tracing::info!(
            stream = id,
            reason,
            sent = stream.sent_count(),
            "Stream stopped"
        );
    }

    /// One production cycle: acquire a buffer, read the next frame, submit
    ///
    /// While a stop is pending the cycle is a silent no-op: no frame is
    /// read and no buffer is consumed, so the cursor stays put for a
    /// potential restart.
    async fn produce(&mut self, id: StreamId) {
        if self.stopping.load(Ordering::Relaxed) {
            return;
        }

        let Some(stream) = self.streams.get_mut(id) else {
            tracing::warn!(stream = id, "Notification for unknown stream");
            return;
        };
        if !stream.is_active() {
            return;
        }

        let mut buf = self.pool.acquire().await;

        let read = match stream.cursor_mut().read_frame() {
            Ok(read) => read,
            Err(err) => {
                tracing::error!(stream = id, %err, "Malformed container; disabling stream");
                stream.begin_stop();
                return;
            }
        };
        if read.wrapped {
            let loops = stream.record_loop();
            tracing::trace!(stream = id, loops, "End of container reached; looping");
        }

        buf.fill(&read.payload);
        let seq_num = stream.seq_num();
        let len = read.payload.len();

        match self.transport.submit(id, buf, seq_num).await {
            Ok(()) => {
                let sent = stream.record_sent(len);
                if sent % 1000 == 0 {
                    tracing::debug!(stream = id, sent, "Sent frames");
                }
            }
            Err(err) => {
                // The stream is done for good; its buffer went back to the
                // pool when the transport dropped it.
                tracing::warn!(stream = id, seq_num, %err, "Submission rejected; disabling stream");
                stream.mark_rejected();
                stream.begin_stop();
            }
        }
    }

    /// Final counters and teardown log
    fn finish(&self, begun: Instant) -> SourceStats {
        let elapsed = begun.elapsed();
        let streams: Vec<StreamStats> = self
            .streams
            .iter()
            .map(|s| StreamStats {
                stream_id: s.id,
                frames_sent: s.sent_count(),
                bytes_sent: s.bytes_sent(),
                loops: s.loop_count(),
                phase: s.phase(),
                rejected: s.was_rejected(),
            })
            .collect();

        let stats = SourceStats { streams, elapsed };
        tracing::info!(
            frames = stats.total_frames(),
            bytes = stats.total_bytes(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Broadcast source stopped"
        );
        stats
    }
}
