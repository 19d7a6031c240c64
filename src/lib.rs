#![cfg_attr(not(test), no_std)]

//! fire_control - Turret, tilt and flywheel fire-control for a competition robot
//!
//! This library owns the hardware-facing half of the shooter: subsystems
//! that drive motors and read switches, the FireControl state machine that
//! sequences them, and the per-tick `Robot` orchestration. Pure algorithms
//! live in `fire_control_core`.

// Logging macros must be declared before the modules that use them
#[macro_use]
pub mod logging;

// Hardware primitive traits, errors and mocks
pub mod platform;

// Turret, tilt, flywheels, intake and vision correction
pub mod subsystems;

// Supervisory state machines
pub mod controllers;

// Per-tick orchestration
pub mod robot;
