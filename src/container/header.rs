//! LC3 container header codec
//!
//! The container starts with a fixed 18-byte header of 9 little-endian u16
//! fields, followed by length-prefixed frames:
//!
//! ```text
//! +---------+----------+-----------+-------------+----------+
//! | FileId  | HdrSize  | SRate/100 | Bitrate/100 | Channels |
//! +---------+----------+-----------+-------------+----------+
//! | Frame/10us | Reserved | SamplesLo | SamplesHi |
//! +------------+----------+-----------+-----------+
//! | Len(2 LE) | Frame(N) | Len(2 LE) | Frame(N) | ...
//! +-----------+----------+-----------+----------+
//! ```
//!
//! Fields are kept in their stored units (100 Hz, 100 bps, 10 µs); scaling to
//! engineering units is the caller's job so the codec stays format-only.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::error::ContainerError;

/// Size of the fixed container header in bytes
pub const HEADER_SIZE: usize = 18;

/// File id marker written by LC3 container producers
pub const LC3_FILE_ID: u16 = 0xCC1C;

/// Parsed LC3 container header
///
/// All fields are raw stored values. `sample_count()` assembles the 32-bit
/// total from its two halves; everything else is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lc3Header {
    /// File id marker
    pub file_id: u16,
    /// Declared header size in bytes
    pub header_size: u16,
    /// Sample rate in units of 100 Hz
    pub srate_100hz: u16,
    /// Bitrate in units of 100 bits/s
    pub bitrate_100bps: u16,
    /// Channel count
    pub channels: u16,
    /// Frame duration in units of 10 µs
    pub frame_10us: u16,
    /// Reserved for future use
    pub rfu: u16,
    /// Low 16 bits of the total sample count
    pub nsamples_low: u16,
    /// High 16 bits of the total sample count
    pub nsamples_high: u16,
}

impl Lc3Header {
    /// Parse a header from the first `HEADER_SIZE` bytes of `data`
    pub fn parse(data: &[u8]) -> Result<Self, ContainerError> {
        if data.len() < HEADER_SIZE {
            return Err(ContainerError::ShortHeader { len: data.len() });
        }

        let mut buf = &data[..HEADER_SIZE];
        Ok(Self {
            file_id: buf.get_u16_le(),
            header_size: buf.get_u16_le(),
            srate_100hz: buf.get_u16_le(),
            bitrate_100bps: buf.get_u16_le(),
            channels: buf.get_u16_le(),
            frame_10us: buf.get_u16_le(),
            rfu: buf.get_u16_le(),
            nsamples_low: buf.get_u16_le(),
            nsamples_high: buf.get_u16_le(),
        })
    }

    /// Encode the header into its bit-exact wire form
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE);
        buf.put_u16_le(self.file_id);
        buf.put_u16_le(self.header_size);
        buf.put_u16_le(self.srate_100hz);
        buf.put_u16_le(self.bitrate_100bps);
        buf.put_u16_le(self.channels);
        buf.put_u16_le(self.frame_10us);
        buf.put_u16_le(self.rfu);
        buf.put_u16_le(self.nsamples_low);
        buf.put_u16_le(self.nsamples_high);
        buf.freeze()
    }

    /// Total sample count assembled from its low/high halves
    pub fn sample_count(&self) -> u32 {
        u32::from(self.nsamples_low) | (u32::from(self.nsamples_high) << 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_bytes() {
        // file id 0xCC00, header size 18, sample rate 16000 Hz (160 * 100),
        // 1 channel, frame 10 ms (1000 * 10us), 160000 samples
        let bytes: [u8; 18] = [
            0x00, 0xCC, 0x12, 0x00, 0xA0, 0x00, 0x00, 0x00, 0x01, 0x00, 0xE8, 0x03, 0x00, 0x00,
            0x00, 0x71, 0x02, 0x00,
        ];

        let hdr = Lc3Header::parse(&bytes).unwrap();
        assert_eq!(hdr.file_id, 0xCC00);
        assert_eq!(hdr.header_size, 18);
        assert_eq!(hdr.srate_100hz, 160);
        assert_eq!(hdr.bitrate_100bps, 0);
        assert_eq!(hdr.channels, 1);
        assert_eq!(hdr.frame_10us, 1000);
        assert_eq!(hdr.sample_count(), 160_000);

        // Scaling is caller-side
        assert_eq!(u32::from(hdr.srate_100hz) * 100, 16_000);
        assert_eq!(u32::from(hdr.frame_10us) * 10, 10_000);
    }

    #[test]
    fn test_round_trip() {
        let hdr = Lc3Header {
            file_id: LC3_FILE_ID,
            header_size: HEADER_SIZE as u16,
            srate_100hz: 480,
            bitrate_100bps: 960,
            channels: 2,
            frame_10us: 750,
            rfu: 0,
            nsamples_low: 0x1234,
            nsamples_high: 0x0002,
        };

        let encoded = hdr.encode();
        assert_eq!(encoded.len(), HEADER_SIZE);

        let decoded = Lc3Header::parse(&encoded).unwrap();
        assert_eq!(decoded, hdr);
        assert_eq!(decoded.sample_count(), 0x0002_1234);
    }

    #[test]
    fn test_short_header() {
        let bytes = [0u8; 17];
        let err = Lc3Header::parse(&bytes).unwrap_err();
        assert_eq!(err, ContainerError::ShortHeader { len: 17 });
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0x1C;
        bytes[1] = 0xCC;
        let hdr = Lc3Header::parse(&bytes).unwrap();
        assert_eq!(hdr.file_id, LC3_FILE_ID);
    }
}
