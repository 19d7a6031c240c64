//! Mock collaborators for testing
//!
//! Like the platform mocks, clones share state so a test can keep a
//! handle after giving the mock away.

#![cfg(any(test, feature = "mock"))]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use fire_control_core::geometry::Pose2d;
use fire_control_core::vision::{VisionFrame, VisionMeasurement};

use super::traits::{Camera, Chassis};

#[derive(Debug, Default)]
struct ChassisState {
    pose: Pose2d,
    measurements: Vec<VisionMeasurement>,
}

/// Chassis whose pose is set by the test. Vision measurements are
/// recorded, not fused.
#[derive(Debug, Clone, Default)]
pub struct MockChassis {
    state: Rc<RefCell<ChassisState>>,
}

impl MockChassis {
    pub fn new(pose: Pose2d) -> Self {
        let chassis = Self::default();
        chassis.state.borrow_mut().pose = pose;
        chassis
    }

    /// Measurements received so far
    pub fn measurements(&self) -> Vec<VisionMeasurement> {
        self.state.borrow().measurements.clone()
    }

    pub fn clear_measurements(&self) {
        self.state.borrow_mut().measurements.clear();
    }
}

impl Chassis for MockChassis {
    fn pose(&self) -> Pose2d {
        self.state.borrow().pose
    }

    fn set_pose(&mut self, pose: Pose2d) {
        self.state.borrow_mut().pose = pose;
    }

    fn add_vision_measurement(&mut self, measurement: &VisionMeasurement) {
        self.state.borrow_mut().measurements.push(*measurement);
    }
}

/// Camera that returns whatever frame the test published last.
#[derive(Debug, Clone)]
pub struct MockCamera {
    name: &'static str,
    frame: Rc<RefCell<VisionFrame>>,
}

impl MockCamera {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            frame: Rc::new(RefCell::new(VisionFrame::default())),
        }
    }

    pub fn publish(&self, frame: VisionFrame) {
        *self.frame.borrow_mut() = frame;
    }
}

impl Camera for MockCamera {
    fn name(&self) -> &'static str {
        self.name
    }

    fn latest_frame(&mut self) -> VisionFrame {
        self.frame.borrow().clone()
    }
}
