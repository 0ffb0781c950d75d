//! Per-stream broadcast state
//!
//! Each broadcast channel is one `BroadcastStream`: a cursor into its
//! container, a wrapping sequence number, a sent counter, and a lifecycle
//! phase driven by transport notifications.

pub mod state;

pub use state::{BroadcastStream, StreamPhase};
