//! Closed-loop control primitives
//!
//! - [`profile`]: trapezoidal motion profile
//! - [`pid`]: PID controller
//! - [`feedforward`]: DC motor feed-forward for velocity-controlled wheels
//! - [`servo`]: profiled angle servo with soft limits

pub mod feedforward;
pub mod pid;
pub mod profile;
pub mod servo;

pub use feedforward::MotorFeedforward;
pub use pid::{PidConfig, PidController};
pub use profile::{MotionConstraints, ProfileState, TrapezoidProfile};
pub use servo::{sanitize_voltage, AngleSetpoint, ProfiledServo, ServoConfig, SoftLimits};
