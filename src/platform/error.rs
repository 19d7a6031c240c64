//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All drivers map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Motor controller operation failed
    Motor(MotorError),
    /// GPIO operation failed
    Gpio(GpioError),
}

/// Motor controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Voltage command was not accepted
    WriteFailed,
    /// Encoder read failed
    ReadFailed,
    /// Controller not responding
    Disconnected,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Input could not be sampled
    ReadFailed,
    /// Output could not be driven
    WriteFailed,
}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl From<MotorError> for PlatformError {
    fn from(error: MotorError) -> Self {
        PlatformError::Motor(error)
    }
}

impl From<GpioError> for PlatformError {
    fn from(error: GpioError) -> Self {
        PlatformError::Gpio(error)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Motor(e) => write!(f, "Motor error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
        }
    }
}

impl PlatformError {
    /// Short name for log output
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformError::Motor(MotorError::WriteFailed) => "motor write failed",
            PlatformError::Motor(MotorError::ReadFailed) => "motor read failed",
            PlatformError::Motor(MotorError::Disconnected) => "motor disconnected",
            PlatformError::Gpio(GpioError::ReadFailed) => "gpio read failed",
            PlatformError::Gpio(GpioError::WriteFailed) => "gpio write failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(
            PlatformError::from(MotorError::ReadFailed),
            PlatformError::Motor(MotorError::ReadFailed)
        );
        assert_eq!(
            PlatformError::from(GpioError::WriteFailed),
            PlatformError::Gpio(GpioError::WriteFailed)
        );
    }

    #[test]
    fn test_display() {
        let text = format!("{}", PlatformError::Motor(MotorError::Disconnected));
        assert_eq!(text, "Motor error: Disconnected");
        assert_eq!(
            PlatformError::Gpio(GpioError::ReadFailed).as_str(),
            "gpio read failed"
        );
    }
}
