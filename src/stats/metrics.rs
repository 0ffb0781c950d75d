//! Counters collected while a source runs

use std::time::Duration;

use crate::stream::StreamPhase;

/// Per-stream counters
#[derive(Debug, Clone)]
pub struct StreamStats {
    /// Stream id
    pub stream_id: usize,
    /// Frames sent since the stream started
    pub frames_sent: u64,
    /// Payload bytes sent
    pub bytes_sent: u64,
    /// Times the container wrapped back to its first frame
    pub loops: u64,
    /// Final lifecycle phase
    pub phase: StreamPhase,
    /// Whether the transport rejected a submission on this stream
    pub rejected: bool,
}

impl StreamStats {
    /// Estimate the stream's payload bitrate over `elapsed`
    pub fn bitrate(&self, elapsed: Duration) -> u64 {
        let secs = elapsed.as_secs();
        if secs > 0 {
            (self.bytes_sent * 8) / secs
        } else {
            0
        }
    }
}

/// Snapshot of a whole source's counters
#[derive(Debug, Clone)]
pub struct SourceStats {
    /// Per-stream counters, indexed by stream id
    pub streams: Vec<StreamStats>,
    /// Wall-clock time the source ran
    pub elapsed: Duration,
}

impl SourceStats {
    /// Total frames sent across all streams
    pub fn total_frames(&self) -> u64 {
        self.streams.iter().map(|s| s.frames_sent).sum()
    }

    /// Total payload bytes sent across all streams
    pub fn total_bytes(&self) -> u64 {
        self.streams.iter().map(|s| s.bytes_sent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(frames: u64, bytes: u64) -> StreamStats {
        StreamStats {
            stream_id: 0,
            frames_sent: frames,
            bytes_sent: bytes,
            loops: 0,
            phase: StreamPhase::Stopped,
            rejected: false,
        }
    }

    #[test]
    fn test_bitrate() {
        let s = stats(100, 4000);
        assert_eq!(s.bitrate(Duration::from_secs(2)), 16_000);
        assert_eq!(s.bitrate(Duration::ZERO), 0);
    }

    #[test]
    fn test_totals() {
        let source = SourceStats {
            streams: vec![stats(10, 400), stats(5, 100)],
            elapsed: Duration::from_secs(1),
        };
        assert_eq!(source.total_frames(), 15);
        assert_eq!(source.total_bytes(), 500);
    }
}
