//! Operator input edge detection
//!
//! Operator controls are polled as raw button levels every tick. The fire
//! control logic wants discrete events instead ("shoot was pressed"), so
//! each button runs through an `EdgeDetector` and the rising edges are
//! collected into an `OperatorEvents` set consumed once per tick.

use bitflags::bitflags;

bitflags! {
    /// Discrete operator requests for one tick
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OperatorEvents: u8 {
        const SHOOT = 1 << 0;
        const INTAKE = 1 << 1;
        const RECOVER = 1 << 2;
        const HEIGHT_UP = 1 << 3;
        const HEIGHT_DOWN = 1 << 4;
        const COLUMN_LEFT = 1 << 5;
        const COLUMN_RIGHT = 1 << 6;
    }
}

/// Rising-edge detector for a polled boolean.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { last: false }
    }

    /// True only on the sample where `level` goes from false to true.
    pub fn update(&mut self, level: bool) -> bool {
        let rising = level && !self.last;
        self.last = level;
        rising
    }

    pub fn reset(&mut self) {
        self.last = false;
    }
}

/// Raw button levels sampled this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    pub shoot: bool,
    pub intake: bool,
    pub recover: bool,
    pub height_up: bool,
    pub height_down: bool,
    pub column_left: bool,
    pub column_right: bool,
}

impl ButtonLevels {
    fn as_array(&self) -> [(bool, OperatorEvents); 7] {
        [
            (self.shoot, OperatorEvents::SHOOT),
            (self.intake, OperatorEvents::INTAKE),
            (self.recover, OperatorEvents::RECOVER),
            (self.height_up, OperatorEvents::HEIGHT_UP),
            (self.height_down, OperatorEvents::HEIGHT_DOWN),
            (self.column_left, OperatorEvents::COLUMN_LEFT),
            (self.column_right, OperatorEvents::COLUMN_RIGHT),
        ]
    }
}

/// Converts button levels into per-tick events.
#[derive(Clone, Debug, Default)]
pub struct OperatorInput {
    detectors: [EdgeDetector; 7],
}

impl OperatorInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, levels: &ButtonLevels) -> OperatorEvents {
        let mut events = OperatorEvents::empty();
        for (detector, (level, event)) in self.detectors.iter_mut().zip(levels.as_array()) {
            if detector.update(level) {
                events |= event;
            }
        }
        events
    }

    /// Forget held buttons, e.g. after the robot was disabled.
    pub fn reset(&mut self) {
        for detector in self.detectors.iter_mut() {
            detector.reset();
        }
    }
}
