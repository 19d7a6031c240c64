//! Fixed shooter mount
//!
//! For a build without a turret: the shooter always points along one
//! azimuth and the driver turns the robot to aim.

use fire_control_core::control::SoftLimits;

use super::traits::{AngleAxis, TurretAxis};
use crate::platform::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMount {
    angle: f32,
}

impl FixedMount {
    /// Mount pointing `angle` radians from robot-forward
    pub fn new(angle: f32) -> Self {
        Self { angle }
    }
}

impl AngleAxis for FixedMount {
    fn set_angle(&mut self, _goal: f32) {}

    fn angle(&self) -> f32 {
        self.angle
    }

    fn angle_goal(&self) -> f32 {
        self.angle
    }

    fn at_angle(&self) -> bool {
        true
    }

    /// Fixed limits, which the flip rule treats as "never flip".
    fn limits(&self) -> SoftLimits {
        SoftLimits::new(self.angle, self.angle)
    }

    fn execute(&mut self, _dt: f32) -> Result<()> {
        Ok(())
    }
}

impl TurretAxis for FixedMount {}
