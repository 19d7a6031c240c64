//! Shooter subsystems
//!
//! Each subsystem exclusively owns its hardware handles and controller
//! state. Setters only record intent; `execute()` runs once per tick,
//! after every setpoint update, reads sensors and writes the actuator
//! commands.

pub mod fixed_mount;
pub mod flywheel;
pub mod intake;
pub mod tilt;
pub mod traits;
pub mod turret;
pub mod vision;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use fixed_mount::FixedMount;
pub use flywheel::FlywheelPair;
pub use intake::Intake;
pub use tilt::Tilt;
pub use traits::{
    AngleAxis, Camera, Chassis, FlywheelControl, IntakeControl, TiltAxis, TurretAxis,
};
pub use turret::Turret;
pub use vision::{CorrectionReport, VisionCorrector};
