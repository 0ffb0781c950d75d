//! Synchronization primitives
//!
//! The broadcast source coordinates startup and teardown with counting waits:
//! one latch satisfied once every stream has reported started, and one
//! satisfied once every stream has reported stopped.

pub mod countdown;

pub use countdown::Countdown;
