//! Lockstep simulation clock.

use std::cell::Cell;
use std::rc::Rc;

use fire_control_core::traits::TimeSource;

/// Simulated time. Clones share the same clock, so cameras and the robot
/// see one timeline that only the simulation advances.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_us: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, us: u64) {
        self.now_us.set(self.now_us.get().saturating_add(us));
    }

    pub fn set(&self, us: u64) {
        self.now_us.set(us);
    }
}

impl TimeSource for SimClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}
