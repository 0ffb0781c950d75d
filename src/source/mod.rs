//! Broadcast source
//!
//! The aggregate of all streams plus the scheduling that feeds them. A
//! source is configured once, started, and then runs until every stream has
//! stopped:
//!
//! ```text
//! SourceConfig ──▶ BroadcastSource::new ──▶ run()
//!                        │                   │
//!                        ▼                   ▼
//!                  SourceHandle        SourceStats
//!            (notifications, stop,
//!             startup/teardown waits)
//! ```

pub mod config;
pub mod error;
pub mod scheduler;

pub use config::{SourceConfig, StreamConfig};
pub use error::SourceError;
pub use scheduler::{BroadcastSource, SourceHandle};
