//! Broadcast source configuration

use std::time::Duration;

use bytes::Bytes;

use super::error::SourceError;

/// Configuration for one broadcast stream
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// The stream's container bytes (shared read-only for the process
    /// lifetime; several streams may reference the same container)
    pub container: Bytes,

    /// Samples covered by one encoded frame at this stream's sample rate
    pub samples_per_frame: u32,

    /// Frame byte budget for this stream, fixed at setup from the
    /// transport's QoS
    pub sdu_size: usize,
}

impl StreamConfig {
    /// Create a stream configuration
    pub fn new(container: Bytes, samples_per_frame: u32, sdu_size: usize) -> Self {
        Self {
            container,
            samples_per_frame,
            sdu_size,
        }
    }
}

/// Configuration for a broadcast source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Frames kept in flight per stream to avoid transport idle time
    pub enqueue_depth: usize,

    /// Transmit buffer pool capacity; `None` sizes the pool to exactly
    /// `enqueue_depth * stream_count`
    pub pool_capacity: Option<usize>,

    /// How long the source is meant to broadcast before the embedder tears
    /// it down; informational, never enforced by the scheduler
    pub lifetime: Option<Duration>,

    /// Per-stream configuration, indexed by stream id
    pub streams: Vec<StreamConfig>,
}

impl SourceConfig {
    /// Create a configuration with the given enqueue depth and no streams
    pub fn new(enqueue_depth: usize) -> Self {
        Self {
            enqueue_depth,
            pool_capacity: None,
            lifetime: None,
            streams: Vec::new(),
        }
    }

    /// Add a stream
    pub fn stream(mut self, config: StreamConfig) -> Self {
        self.streams.push(config);
        self
    }

    /// Override the transmit buffer pool capacity
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = Some(capacity);
        self
    }

    /// Set the advisory source lifetime
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Buffers needed so the transport is never starved
    pub fn required_buffers(&self) -> usize {
        self.enqueue_depth * self.streams.len()
    }

    /// Pool capacity after applying the default sizing rule
    pub fn effective_pool_capacity(&self) -> usize {
        self.pool_capacity.unwrap_or_else(|| self.required_buffers())
    }

    /// Check the static configuration invariants
    ///
    /// The capacity invariant (pool ≥ enqueue_depth × stream_count) is
    /// enforced here, once, so a pool exhaustion can never surface at
    /// runtime as anything but a short wait.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.enqueue_depth == 0 {
            return Err(SourceError::ZeroEnqueueDepth);
        }
        if self.streams.is_empty() {
            return Err(SourceError::NoStreams);
        }
        for (id, stream) in self.streams.iter().enumerate() {
            if stream.samples_per_frame == 0 {
                return Err(SourceError::InvalidSamplesPerFrame { stream: id });
            }
        }

        let capacity = self.effective_pool_capacity();
        let required = self.required_buffers();
        if capacity < required {
            return Err(SourceError::InsufficientBuffers { capacity, required });
        }

        Ok(())
    }
}
