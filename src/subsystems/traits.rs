//! Subsystem capability traits
//!
//! FireControl and `Robot` only see these traits, so a robot can swap an
//! indexed turret for a fixed mount, or real hardware for simulation,
//! without touching the state machine.

use fire_control_core::control::SoftLimits;
use fire_control_core::geometry::Pose2d;
use fire_control_core::mechanism::IndexState;
use fire_control_core::vision::{VisionFrame, VisionMeasurement};

use crate::platform::Result;

/// Position-controlled rotary axis.
pub trait AngleAxis {
    /// Store a new goal, clamped into the soft limits
    fn set_angle(&mut self, goal: f32);

    /// Measured angle from the last `execute()` (rad)
    fn angle(&self) -> f32;

    /// Stored goal (rad), always inside the soft limits
    fn angle_goal(&self) -> f32;

    /// Measured angle within tolerance of the goal
    fn at_angle(&self) -> bool;

    fn limits(&self) -> SoftLimits;

    /// Read sensors and write the voltage command for this tick
    fn execute(&mut self, dt: f32) -> Result<()>;

    /// Zero the output without running the servo, e.g. while disabled
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Azimuth axis. Only an indexed turret ever reports `NotFound`.
pub trait TurretAxis: AngleAxis {
    fn index_state(&self) -> IndexState {
        IndexState::Found
    }

    /// Forget the index and search for a limit switch again
    fn rehome(&mut self) {}
}

/// Elevation axis with an intake preset.
pub trait TiltAxis: AngleAxis {
    /// Goal the angle that lines the shooter up with the intake
    fn set_intake(&mut self);
}

/// Flywheels plus the feed roller behind them.
pub trait FlywheelControl {
    /// Target angular velocities (rad/s)
    fn set_speed(&mut self, top: f32, bottom: f32);

    /// Zero both targets and idle the feed
    fn stop(&mut self);

    /// Pull a game piece in
    fn load(&mut self);

    /// Push the loaded piece into the wheels
    fn shoot(&mut self);

    /// Idle the feed, keeping wheel targets
    fn stop_feed(&mut self);

    /// Both wheels at a positive target and a piece loaded
    fn is_ready(&self) -> bool;

    /// Sensor or manual latch says a piece is held
    fn is_loaded(&self) -> bool;

    fn is_loading(&self) -> bool;

    fn is_shooting(&self) -> bool;

    /// The piece has left after shooting long enough
    fn has_shot(&self) -> bool;

    /// Manual override for a failed loaded sensor
    fn set_has_cube(&mut self, has_cube: bool);

    fn execute(&mut self, dt: f32) -> Result<()>;
}

/// Ground intake.
pub trait IntakeControl {
    fn deploy(&mut self);

    fn retract(&mut self);

    fn is_deployed(&self) -> bool;

    fn execute(&mut self) -> Result<()>;
}

/// Drivetrain and its pose estimator (external collaborator).
pub trait Chassis {
    /// Current estimated field pose
    fn pose(&self) -> Pose2d;

    /// Reset the estimate
    fn set_pose(&mut self, pose: Pose2d);

    /// Fuse a vision measurement into the estimate
    fn add_vision_measurement(&mut self, measurement: &VisionMeasurement);
}

/// Fiducial-detecting camera pipeline (external collaborator).
pub trait Camera {
    /// Name for log output
    fn name(&self) -> &'static str;

    /// Most recent result; may repeat the previous frame
    fn latest_frame(&mut self) -> VisionFrame;
}
