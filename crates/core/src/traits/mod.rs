//! Platform-agnostic trait abstractions.
//!
//! Hardware-facing traits (motors, switches, chassis, camera) live in the
//! root crate; only the clock is needed by pure logic.

pub mod time;

pub use time::{MockTime, TimeSource};
