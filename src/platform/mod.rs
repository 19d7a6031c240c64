//! Platform abstraction layer
//!
//! Hardware primitives the subsystems are written against. Motor
//! controllers implement [`MotorInterface`]; switches, sensors and
//! solenoid valves use the `embedded-hal` digital pin traits with
//! [`GpioError`] as their error type.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{GpioError, MotorError, PlatformError, Result};
pub use traits::{InputPin, MotorInterface, OutputPin};
