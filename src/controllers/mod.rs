//! Supervisory controllers
//!
//! Controllers decide what the subsystems should do; subsystems decide how.

pub mod fire_control;

pub use fire_control::{FireControl, Mechanisms};
