//! Shooter tilt
//!
//! Driven through an absolute encoder that can power up anywhere inside
//! one revolution. Raw readings are folded back into the operating band
//! before the controller sees them.

use fire_control_core::control::{ProfiledServo, SoftLimits};
use fire_control_core::mechanism::TiltConfig;

use super::traits::{AngleAxis, TiltAxis};
use crate::platform::{MotorInterface, Result};

/// Tilt axis with unwrap correction and an intake preset.
pub struct Tilt<M> {
    config: TiltConfig,
    motor: M,
    servo: ProfiledServo,
    measured: f32,
    /// A reading has been taken and the profile started from it
    primed: bool,
}

impl<M: MotorInterface> Tilt<M> {
    pub fn new(config: TiltConfig, motor: M) -> Self {
        Self {
            servo: ProfiledServo::new(config.servo),
            config,
            motor,
            measured: 0.0,
            primed: false,
        }
    }

    pub fn config(&self) -> &TiltConfig {
        &self.config
    }
}

impl<M: MotorInterface> AngleAxis for Tilt<M> {
    fn set_angle(&mut self, goal: f32) {
        self.servo.set_goal(goal);
    }

    fn angle(&self) -> f32 {
        self.measured
    }

    fn angle_goal(&self) -> f32 {
        self.servo.goal()
    }

    fn at_angle(&self) -> bool {
        self.primed && self.servo.at_goal(self.measured)
    }

    fn limits(&self) -> SoftLimits {
        *self.servo.limits()
    }

    fn execute(&mut self, dt: f32) -> Result<()> {
        let raw = match self.motor.position() {
            Ok(raw) => raw,
            Err(e) => {
                let _ = self.motor.stop();
                return Err(e);
            }
        };
        self.measured = self.config.unwrap(raw);
        if !self.primed {
            self.servo.reset(self.measured);
            self.primed = true;
        }

        let voltage = self.servo.calculate(self.measured, dt);
        self.motor.set_voltage(voltage)
    }

    fn stop(&mut self) -> Result<()> {
        // Profile restarts from the measured angle on the next execute
        self.primed = false;
        self.motor.stop()
    }
}

impl<M: MotorInterface> TiltAxis for Tilt<M> {
    fn set_intake(&mut self) {
        self.servo.set_goal(self.config.intake_angle);
    }
}
