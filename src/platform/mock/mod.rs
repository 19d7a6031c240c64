//! Mock platform implementation for testing
//!
//! Mocks share their state through cloned handles: keep one clone in the
//! test, hand the other to the subsystem, then inspect what the subsystem
//! commanded.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use fire_control::platform::mock::MockMotor;
//! use fire_control::platform::MotorInterface;
//!
//! let motor = MockMotor::new();
//! let mut handle = motor.clone();
//! handle.set_voltage(3.0).unwrap();
//! assert_eq!(motor.voltage(), 3.0);
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod motor;

pub use gpio::{MockInput, MockOutput};
pub use motor::MockMotor;
