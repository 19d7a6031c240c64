//! Indexed turret
//!
//! The azimuth encoder is relative, so angles mean nothing until the
//! turret has touched a limit switch. Until then it creeps towards the
//! configured switch at a fixed voltage. Every later contact rezeroes the
//! encoder again, which keeps the calibration through switch bounce.
//!
//! # Homing
//!
//! ```text
//! NotFound ──(forward or reverse switch)──> Found
//!    ^                                        │
//!    └────────────── rehome() ────────────────┘
//! ```
//!
//! Both switches closed at once is a sensor fault: the turret outputs
//! zero volts and holds until the fault clears. A switch that cannot be
//! read is treated the same way.

use fire_control_core::control::{ProfiledServo, SoftLimits};
use fire_control_core::mechanism::{IndexState, LimitContact, TurretConfig};

use super::traits::{AngleAxis, TurretAxis};
use crate::platform::{InputPin, MotorInterface, Result};

/// Turret with dual limit-switch homing.
pub struct Turret<M, S> {
    config: TurretConfig,
    motor: M,
    forward_switch: S,
    reverse_switch: S,
    servo: ProfiledServo,
    index: IndexState,
    contact: LimitContact,
    measured: f32,
}

impl<M: MotorInterface, S: InputPin> Turret<M, S> {
    pub fn new(config: TurretConfig, motor: M, forward_switch: S, reverse_switch: S) -> Self {
        Self {
            servo: ProfiledServo::new(config.servo),
            config,
            motor,
            forward_switch,
            reverse_switch,
            index: IndexState::NotFound,
            contact: LimitContact::None,
            measured: 0.0,
        }
    }

    pub fn config(&self) -> &TurretConfig {
        &self.config
    }

    /// Switch state sampled by the last `execute()`
    pub fn contact(&self) -> LimitContact {
        self.contact
    }

    fn read_contact(&mut self) -> LimitContact {
        let active_low = self.config.switches_active_low;
        let forward = switch_closed(&mut self.forward_switch, active_low);
        let reverse = switch_closed(&mut self.reverse_switch, active_low);
        match (forward, reverse) {
            (Some(forward), Some(reverse)) => LimitContact::from_switches(forward, reverse),
            _ => {
                log_warn!("turret: limit switch read failed");
                LimitContact::Both
            }
        }
    }

    /// Zero output and pass the error on.
    fn fail(&mut self, error: crate::platform::PlatformError) -> Result<()> {
        let _ = self.motor.stop();
        Err(error)
    }
}

fn switch_closed<S: InputPin>(pin: &mut S, active_low: bool) -> Option<bool> {
    pin.is_high().ok().map(|high| high != active_low)
}

impl<M: MotorInterface, S: InputPin> AngleAxis for Turret<M, S> {
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
        self.index.is_found() && self.servo.at_goal(self.measured)
    }

    fn limits(&self) -> SoftLimits {
        *self.servo.limits()
    }

    fn execute(&mut self, dt: f32) -> Result<()> {
        let contact = self.read_contact();
        if contact == LimitContact::Both {
            if self.contact != LimitContact::Both {
                log_warn!("turret: both limit switches closed, holding");
            }
            self.contact = contact;
            return self.motor.stop();
        }
        self.contact = contact;

        if let Some(limit) = self.config.limit_angle(contact) {
            if let Err(e) = self.motor.set_position(limit) {
                return self.fail(e);
            }
            self.measured = limit;
            if !self.index.is_found() {
                self.index = IndexState::Found;
                self.servo.reset(limit);
                log_info!("turret: index found on {} switch", contact.as_str());
            }
        }

        if !self.index.is_found() {
            let voltage = self.config.index_search_voltage * self.config.index_direction.sign();
            return self.motor.set_voltage(voltage);
        }

        if contact == LimitContact::None {
            match self.motor.position() {
                Ok(angle) => self.measured = angle,
                Err(e) => return self.fail(e),
            }
        }

        // Goal is inside the soft limits, so this also backs off a switch
        let voltage = self.servo.calculate(self.measured, dt);
        self.motor.set_voltage(voltage)
    }

    fn stop(&mut self) -> Result<()> {
        self.motor.stop()
    }
}

impl<M: MotorInterface, S: InputPin> TurretAxis for Turret<M, S> {
    fn index_state(&self) -> IndexState {
        self.index
    }

    fn rehome(&mut self) {
        if self.index.is_found() {
            log_info!("turret: re-homing");
        }
        self.index = IndexState::NotFound;
    }
}
