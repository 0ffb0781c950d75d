//! Loopback broadcast demo
//!
//! Run with: cargo run --example loopback
//!
//! Builds two in-memory containers of synthetic tone frames and broadcasts
//! them over an in-process transport that completes each send after one fake
//! ISO interval. Useful for watching the scheduler's pacing without any
//! radio hardware: set `RUST_LOG=lc3cast=trace` to see wraps and per-1000
//! progress events.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lc3cast::{
    BroadcastSource, ContainerBuilder, EventSender, SourceConfig, StreamConfig, StreamId,
    SubmitError, Transport, TxBuffer,
};

/// Frame byte budget for every demo stream
const SDU_SIZE: usize = 40;

/// Samples per frame at 16 kHz / 10 ms
const SAMPLES_PER_FRAME: u32 = 160;

/// In-process transport that pretends every send takes one ISO interval
struct LoopbackTransport {
    events: Mutex<Option<EventSender>>,
    interval: Duration,
}

impl LoopbackTransport {
    fn new(interval: Duration) -> Self {
        Self {
            events: Mutex::new(None),
            interval,
        }
    }

    fn connect(&self, events: EventSender) {
        *self.events.lock().unwrap() = Some(events);
    }
}

impl Transport for LoopbackTransport {
    async fn submit(
        &self,
        stream_id: StreamId,
        buf: TxBuffer,
        seq_num: u16,
    ) -> Result<(), SubmitError> {
        tracing::trace!(stream = stream_id, seq_num, len = buf.len(), "Frame on the air");

        let events = self.events.lock().unwrap().clone();
        let interval = self.interval;
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // The buffer returns to the pool here, then the completion fires
            drop(buf);
            if let Some(events) = events {
                events.sent(stream_id);
            }
        });

        Ok(())
    }
}

/// Deterministic stand-in for encoded audio: one container of `count` frames
/// whose bytes follow a per-stream tone pattern
fn tone_container(seed: u8, count: usize) -> bytes::Bytes {
    let mut builder = ContainerBuilder::new(16_000, 10_000, 1).bitrate(32_000);
    for i in 0..count {
        let frame: Vec<u8> = (0..SDU_SIZE)
            .map(|j| (seed as usize * 31 + i * 7 + j) as u8)
            .collect();
        builder = builder.frame(&frame);
    }
    builder.build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = SourceConfig::new(3)
        .stream(StreamConfig::new(tone_container(1, 100), SAMPLES_PER_FRAME, SDU_SIZE))
        .stream(StreamConfig::new(tone_container(2, 100), SAMPLES_PER_FRAME, SDU_SIZE))
        .lifetime(Duration::from_secs(10));

    let transport = Arc::new(LoopbackTransport::new(Duration::from_millis(10)));
    let source = BroadcastSource::new(config, Arc::clone(&transport))?;
    let stream_count = source.stream_count();
    let handle = source.handle();
    transport.connect(handle.events().clone());

    let broadcast = tokio::spawn(source.run());

    // Stand in for the radio confirming each channel
    for id in 0..stream_count {
        handle.notifier(id).started();
    }
    handle.wait_started().await;
    tracing::info!(streams = stream_count, "Broadcasting");

    // Broadcast for the advisory lifetime, then wind down
    let lifetime = handle.lifetime().unwrap_or(Duration::from_secs(10));
    tokio::time::sleep(lifetime).await;

    tracing::info!("Lifetime reached; stopping");
    handle.stop();
    for id in 0..stream_count {
        handle.notifier(id).stopped(0);
    }
    handle.wait_stopped().await;

    let stats = broadcast.await?;
    for stream in &stats.streams {
        tracing::info!(
            stream = stream.stream_id,
            frames = stream.frames_sent,
            loops = stream.loops,
            bitrate = stream.bitrate(stats.elapsed),
            "Stream totals"
        );
    }

    Ok(())
}
