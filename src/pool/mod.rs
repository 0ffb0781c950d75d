//! Transmit buffer pool
//!
//! A fixed set of reusable byte buffers shared by every stream. Acquisition
//! suspends until a buffer is free, which is the system's only blocking point
//! and the whole of its flow control: with the pool sized to
//! `enqueue_depth * stream_count`, a stream can never queue more frames than
//! the transport has accepted.
//!
//! Buffers hand themselves back on drop, so release happens on both the
//! confirmed-send path and every failure path without bookkeeping at the
//! call sites.

pub mod tx;

pub use tx::{TxBuffer, TxBufferPool};
