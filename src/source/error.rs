//! Source setup error types
//!
//! Every variant is fatal at construction: a misconfigured source must fail
//! to start rather than degrade at runtime.

use crate::container::ContainerError;

/// Error type for broadcast source setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No streams configured
    NoStreams,
    /// Enqueue depth of zero would never put a frame in flight
    ZeroEnqueueDepth,
    /// A stream's samples-per-frame is zero
    InvalidSamplesPerFrame {
        /// Offending stream id
        stream: usize,
    },
    /// Pool capacity below enqueue_depth × stream_count would starve the
    /// transport
    InsufficientBuffers {
        /// Configured capacity
        capacity: usize,
        /// Minimum capacity for the configured streams
        required: usize,
    },
    /// A stream's container holds no complete frame
    EmptyStream {
        /// Offending stream id
        stream: usize,
    },
    /// A stream's container failed to parse
    Container {
        /// Offending stream id
        stream: usize,
        /// Underlying container error
        source: ContainerError,
    },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::NoStreams => write!(f, "No streams configured"),
            SourceError::ZeroEnqueueDepth => write!(f, "Enqueue depth must be at least 1"),
            SourceError::InvalidSamplesPerFrame { stream } => {
                write!(f, "Stream {}: samples per frame must be at least 1", stream)
            }
            SourceError::InsufficientBuffers { capacity, required } => write!(
                f,
                "Pool capacity {} below required {} (enqueue depth x stream count)",
                capacity, required
            ),
            SourceError::EmptyStream { stream } => {
                write!(f, "Stream {}: container holds no complete frame", stream)
            }
            SourceError::Container { stream, source } => {
                write!(f, "Stream {}: {}", stream, source)
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Container { source, .. } => Some(source),
            _ => None,
        }
    }
}
