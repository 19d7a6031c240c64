//! Ground intake
//!
//! A double-acting piston (one valve per direction) swings the intake out;
//! front and tunnel rollers run only while it is deployed.

use fire_control_core::mechanism::IntakeConfig;

use super::traits::IntakeControl;
use crate::platform::{GpioError, MotorInterface, OutputPin, PlatformError, Result};

pub struct Intake<M, P> {
    config: IntakeConfig,
    front_motor: M,
    tunnel_motor: M,
    extend_valve: P,
    retract_valve: P,
    deployed: bool,
}

impl<M: MotorInterface, P: OutputPin> Intake<M, P> {
    pub fn new(
        config: IntakeConfig,
        front_motor: M,
        tunnel_motor: M,
        extend_valve: P,
        retract_valve: P,
    ) -> Self {
        Self {
            config,
            front_motor,
            tunnel_motor,
            extend_valve,
            retract_valve,
            deployed: false,
        }
    }

    fn set_valves(&mut self, extend: bool) -> Result<()> {
        let extend_result = self.extend_valve.set_state(extend.into());
        let retract_result = self.retract_valve.set_state((!extend).into());
        extend_result
            .and(retract_result)
            .map_err(|_| PlatformError::Gpio(GpioError::WriteFailed))
    }
}

impl<M: MotorInterface, P: OutputPin> IntakeControl for Intake<M, P> {
    fn deploy(&mut self) {
        self.deployed = true;
    }

    fn retract(&mut self) {
        self.deployed = false;
    }

    fn is_deployed(&self) -> bool {
        self.deployed
    }

    fn execute(&mut self) -> Result<()> {
        let valves = self.set_valves(self.deployed);
        let (front, tunnel) = if self.deployed {
            (self.config.front_voltage, self.config.tunnel_voltage)
        } else {
            (0.0, 0.0)
        };
        let front = self.front_motor.set_voltage(front);
        let tunnel = self.tunnel_motor.set_voltage(tunnel);
        valves.and(front).and(tunnel)
    }
}
