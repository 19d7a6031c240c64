//! Motor controller interface
//!
//! A smart motor controller with an integrated encoder. Angles are in
//! radians of the driven mechanism (gear ratio already applied), velocities
//! in rad/s, commands in volts.

use crate::platform::Result;

/// Motor controller interface trait
///
/// # Invariants
///
/// - `position()` reflects the last value written by `set_position()` plus
///   any motion since
/// - Implementations clamp `set_voltage()` to their bus voltage; callers
///   still sanitize NaN before calling
pub trait MotorInterface {
    /// Command an output voltage
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Motor(MotorError::WriteFailed)` if the
    /// controller rejected the command.
    fn set_voltage(&mut self, volts: f32) -> Result<()>;

    /// Read the mechanism angle (rad)
    fn position(&mut self) -> Result<f32>;

    /// Read the mechanism angular velocity (rad/s)
    fn velocity(&mut self) -> Result<f32>;

    /// Overwrite the encoder's angle register
    ///
    /// Used to rezero an axis against a known physical reference.
    fn set_position(&mut self, angle: f32) -> Result<()>;

    /// Command zero volts
    fn stop(&mut self) -> Result<()> {
        self.set_voltage(0.0)
    }
}
