//! Software-in-the-loop harness for the fire-control core
//!
//! Simulated motors, switches, sensors, chassis and cameras implement the
//! same platform traits as the real hardware, so the unmodified `Robot`
//! runs against them in lockstep with a simple physics model.

pub mod camera;
pub mod chassis;
pub mod clock;
pub mod error;
pub mod hardware;
pub mod simulation;

pub use camera::{CameraConfig, SimCamera};
pub use chassis::{ChassisConfig, SimChassis};
pub use clock::SimClock;
pub use error::SimulationError;
pub use hardware::{MotorModel, SimMotor, SimSensor, SimSwitch, SimValve};
pub use simulation::{ShotRecord, SimConfig, SimRobot, Simulation};
