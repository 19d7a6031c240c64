//! Mock motor controller

extern crate alloc;

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::platform::{
    error::{MotorError, PlatformError},
    traits::MotorInterface,
    Result,
};

#[derive(Debug, Default)]
struct MotorState {
    voltage: f32,
    position: f32,
    velocity: f32,
    fail_reads: bool,
    fail_writes: bool,
    position_writes: u32,
}

/// Mock motor controller
///
/// Records the last commanded voltage. Position and velocity are whatever
/// the test sets; nothing integrates.
#[derive(Debug, Clone, Default)]
pub struct MockMotor {
    state: Rc<RefCell<MotorState>>,
}

impl MockMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last commanded voltage
    pub fn voltage(&self) -> f32 {
        self.state.borrow().voltage
    }

    /// Current encoder angle
    pub fn angle(&self) -> f32 {
        self.state.borrow().position
    }

    /// Set the angle the encoder reports
    pub fn set_angle(&self, angle: f32) {
        self.state.borrow_mut().position = angle;
    }

    /// Set the velocity the encoder reports
    pub fn set_speed(&self, velocity: f32) {
        self.state.borrow_mut().velocity = velocity;
    }

    /// Number of encoder overwrites so far
    pub fn position_writes(&self) -> u32 {
        self.state.borrow().position_writes
    }

    /// Make every read fail
    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    /// Make every write fail
    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl MotorInterface for MockMotor {
    fn set_voltage(&mut self, volts: f32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(PlatformError::Motor(MotorError::WriteFailed));
        }
        state.voltage = volts;
        Ok(())
    }

    fn position(&mut self) -> Result<f32> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(PlatformError::Motor(MotorError::ReadFailed));
        }
        Ok(state.position)
    }

    fn velocity(&mut self) -> Result<f32> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(PlatformError::Motor(MotorError::ReadFailed));
        }
        Ok(state.velocity)
    }

    fn set_position(&mut self, angle: f32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(PlatformError::Motor(MotorError::WriteFailed));
        }
        state.position = angle;
        state.position_writes += 1;
        Ok(())
    }
}
