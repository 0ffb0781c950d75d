//! Container assembly
//!
//! Builds a complete LC3 container (header plus length-prefixed frames) from
//! already-encoded frame payloads. Mostly used to construct fixtures and demo
//! sources; the streaming path only ever reads containers.

use bytes::{BufMut, Bytes, BytesMut};

use super::header::{Lc3Header, HEADER_SIZE, LC3_FILE_ID};

/// Builder for an in-memory LC3 container
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    srate_hz: u32,
    frame_us: u32,
    channels: u16,
    bitrate_bps: u32,
    frames: Vec<Bytes>,
}

impl ContainerBuilder {
    /// Create a builder for the given sample rate (Hz), frame duration (µs)
    /// and channel count
    pub fn new(srate_hz: u32, frame_us: u32, channels: u16) -> Self {
        Self {
            srate_hz,
            frame_us,
            channels,
            bitrate_bps: 0,
            frames: Vec::new(),
        }
    }

    /// Set the nominal bitrate in bits/s
    pub fn bitrate(mut self, bps: u32) -> Self {
        self.bitrate_bps = bps;
        self
    }

    /// Append one encoded frame payload
    pub fn frame(mut self, payload: &[u8]) -> Self {
        debug_assert!(payload.len() <= u16::MAX as usize);
        self.frames.push(Bytes::copy_from_slice(payload));
        self
    }

    /// Samples one frame covers at this sample rate and frame duration
    pub fn samples_per_frame(&self) -> u32 {
        (u64::from(self.srate_hz) * u64::from(self.frame_us) / 1_000_000) as u32
    }

    /// Number of frames appended so far
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Assemble the container bytes
    pub fn build(&self) -> Bytes {
        let nsamples = self.samples_per_frame() as u64 * self.frames.len() as u64;
        let header = Lc3Header {
            file_id: LC3_FILE_ID,
            header_size: HEADER_SIZE as u16,
            srate_100hz: (self.srate_hz / 100) as u16,
            bitrate_100bps: (self.bitrate_bps / 100) as u16,
            channels: self.channels,
            frame_10us: (self.frame_us / 10) as u16,
            rfu: 0,
            nsamples_low: (nsamples & 0xFFFF) as u16,
            nsamples_high: ((nsamples >> 16) & 0xFFFF) as u16,
        };

        let body_len: usize = self.frames.iter().map(|f| 2 + f.len()).sum();
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + body_len);
        buf.put_slice(&header.encode());
        for frame in &self.frames {
            buf.put_u16_le(frame.len() as u16);
            buf.put_slice(frame);
        }
        buf.freeze()
    }
}
