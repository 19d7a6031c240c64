//! Platform trait definitions
//!
//! Drivers implement these traits; subsystems are generic over them.

pub mod motor;

pub use motor::MotorInterface;

// Digital pins come straight from embedded-hal
pub use embedded_hal::digital::{InputPin, OutputPin};
