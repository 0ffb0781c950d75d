//! LC3 broadcast audio streaming
//!
//! `lc3cast` streams pre-encoded LC3 audio frames from in-memory containers
//! over a fixed set of concurrent broadcast streams. Transmission is paced by
//! the downstream transport: a finite transmit buffer pool plus per-stream
//! send-completion notifications keep every channel's queue full without ever
//! overrunning it, and each stream loops its container forever.
//!
//! # Architecture
//!
//! ```text
//!  Container (Bytes)          BroadcastSource
//! ┌────────────────┐     ┌──────────────────────┐
//! │ header │ frames │────▶│ FrameCursor per stream│
//! └────────────────┘     │ scheduler event loop │◀── started/stopped/sent
//!                        └─────────┬────────────┘        notifications
//!                                  │ acquire
//!                        ┌─────────▼────────────┐
//!                        │    TxBufferPool      │  (blocks when exhausted:
//!                        └─────────┬────────────┘   the only backpressure)
//!                                  │ submit(stream, buf, seq)
//!                        ┌─────────▼────────────┐
//!                        │      Transport       │  (radio / loopback / ...)
//!                        └──────────────────────┘
//! ```
//!
//! The transport seam is deliberately narrow: the crate only calls
//! [`Transport::submit`] and reacts to the three per-stream notifications.
//! Advertising, session negotiation and encryption belong to the embedder.
//!
//! # Example
//!
//! ```no_run
//! use lc3cast::{BroadcastSource, ContainerBuilder, SourceConfig, StreamConfig};
//! # use lc3cast::{SubmitError, Transport, TxBuffer};
//! # struct NullTransport;
//! # impl Transport for NullTransport {
//! #     async fn submit(
//! #         &self,
//! #         _stream_id: lc3cast::StreamId,
//! #         _buf: TxBuffer,
//! #         _seq_num: u16,
//! #     ) -> Result<(), SubmitError> {
//! #         Ok(())
//! #     }
//! # }
//!
//! # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = ContainerBuilder::new(16_000, 10_000, 1)
//!     .frame(&[0u8; 40])
//!     .build();
//!
//! let config = SourceConfig::new(3)
//!     .stream(StreamConfig::new(container, 160, 40));
//!
//! let source = BroadcastSource::new(config, NullTransport)?;
//! let handle = source.handle();
//!
//! // The transport integration delivers notifications through `handle`;
//! // `run` drives the streams until all of them have stopped.
//! let stats = source.run().await;
//! println!("sent {} frames", stats.total_frames());
//! # Ok(()) }
//! ```

pub mod container;
pub mod pool;
pub mod source;
pub mod stats;
pub mod stream;
pub mod sync;
pub mod transport;

pub use container::{ContainerBuilder, ContainerError, FrameCursor, FrameRead, Lc3Header};
pub use pool::{TxBuffer, TxBufferPool};
pub use source::{BroadcastSource, SourceConfig, SourceError, SourceHandle, StreamConfig};
pub use stats::{SourceStats, StreamStats};
pub use stream::{BroadcastStream, StreamPhase};
pub use transport::{EventSender, StreamEvent, StreamId, StreamNotifier, SubmitError, Transport};
