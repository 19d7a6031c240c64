//! fire_control_core - Pure no_std logic for the robot fire-control core
//!
//! This crate contains the platform-agnostic algorithms and types behind
//! the shooter: ballistics lookup, target selection, motion profiling,
//! vision gating and the tunable configuration of every mechanism. It is
//! tested on host without any feature flags or hardware dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`geometry`]: Field poses and angle helpers
//! - [`control`]: Trapezoid profiles, PID, feedforward, profiled servo
//! - [`ballistics`]: Range tables and the turret/tilt/flywheel solver
//! - [`targeting`]: Field layout and scoring-node selection
//! - [`vision`]: Camera geometry and measurement gating
//! - [`input`]: Operator button edge detection
//! - [`mechanism`]: Calibrated mechanism configuration
//! - [`supervisor`]: Fire-control state and tuning
//! - [`parameters`]: Runtime parameter store and tunable blocks

#![no_std]

pub mod ballistics;
pub mod control;
pub mod geometry;
pub mod input;
pub mod mechanism;
pub mod parameters;
pub mod supervisor;
pub mod targeting;
pub mod traits;
pub mod vision;
