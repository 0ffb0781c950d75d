//! Container error types
//!
//! Error types for LC3 container parsing and frame extraction.

/// Error type for container operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Buffer too short to hold the fixed container header
    ShortHeader {
        /// Bytes actually available
        len: usize,
    },
    /// A frame's length prefix or declared payload would read past the byte window
    TruncatedFrame {
        /// Offset of the offending frame's length prefix
        offset: usize,
        /// Bytes required past the offset (prefix + declared payload)
        needed: usize,
        /// Bytes actually available past the offset
        available: usize,
    },
}

impl std::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerError::ShortHeader { len } => {
                write!(f, "Container too short for header: {} bytes", len)
            }
            ContainerError::TruncatedFrame {
                offset,
                needed,
                available,
            } => write!(
                f,
                "Truncated frame at offset {}: needs {} bytes, {} available",
                offset, needed, available
            ),
        }
    }
}

impl std::error::Error for ContainerError {}
