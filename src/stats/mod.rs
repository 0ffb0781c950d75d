//! Statistics for broadcast streams

pub mod metrics;

pub use metrics::{SourceStats, StreamStats};
