//! Simulated chassis pose estimator
//!
//! Holds the true field pose and an odometry estimate that drifts away from
//! it. Vision measurements pull the estimate back with a fixed gain.

use std::cell::RefCell;
use std::rc::Rc;

use fire_control::subsystems::Chassis;
use fire_control_core::geometry::{wrap_angle, Pose2d};
use fire_control_core::vision::VisionMeasurement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisConfig {
    /// Odometry drift (x m/s, y m/s, heading rad/s)
    pub drift: [f32; 3],
    /// Fraction of the vision residual applied per measurement
    pub vision_gain: f32,
}

impl Default for ChassisConfig {
    fn default() -> Self {
        Self {
            drift: [0.0; 3],
            vision_gain: 0.2,
        }
    }
}

impl ChassisConfig {
    pub fn is_valid(&self) -> bool {
        self.drift.iter().all(|d| d.is_finite())
            && self.vision_gain > 0.0
            && self.vision_gain <= 1.0
    }
}

#[derive(Debug)]
struct ChassisState {
    config: ChassisConfig,
    truth: Pose2d,
    estimate: Pose2d,
    fused: u32,
}

#[derive(Debug, Clone)]
pub struct SimChassis {
    state: Rc<RefCell<ChassisState>>,
}

impl SimChassis {
    pub fn new(pose: Pose2d, config: ChassisConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(ChassisState {
                config,
                truth: pose,
                estimate: pose,
                fused: 0,
            })),
        }
    }

    /// Let odometry drift for `dt`.
    pub fn step(&self, dt: f32) {
        let mut s = self.state.borrow_mut();
        let [dx, dy, dh] = s.config.drift;
        s.estimate.x += dx * dt;
        s.estimate.y += dy * dt;
        s.estimate.heading = wrap_angle(s.estimate.heading + dh * dt);
    }

    pub fn true_pose(&self) -> Pose2d {
        self.state.borrow().truth
    }

    /// Move the robot without telling odometry, e.g. after a collision.
    pub fn displace(&self, pose: Pose2d) {
        self.state.borrow_mut().truth = pose;
    }

    pub fn estimate(&self) -> Pose2d {
        self.state.borrow().estimate
    }

    /// Planar distance between estimate and truth (m)
    pub fn estimate_error(&self) -> f32 {
        let s = self.state.borrow();
        s.estimate.distance_to(&s.truth)
    }

    /// Vision measurements fused so far
    pub fn fused(&self) -> u32 {
        self.state.borrow().fused
    }
}

impl Chassis for SimChassis {
    fn pose(&self) -> Pose2d {
        self.state.borrow().estimate
    }

    fn set_pose(&mut self, pose: Pose2d) {
        self.state.borrow_mut().estimate = pose;
    }

    fn add_vision_measurement(&mut self, measurement: &VisionMeasurement) {
        let mut s = self.state.borrow_mut();
        let gain = s.config.vision_gain;
        let m = measurement.pose;
        s.estimate.x += gain * (m.x - s.estimate.x);
        s.estimate.y += gain * (m.y - s.estimate.y);
        let turn = wrap_angle(m.heading - s.estimate.heading);
        s.estimate.heading = wrap_angle(s.estimate.heading + gain * turn);
        s.fused += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_and_fusion() {
        let config = ChassisConfig {
            drift: [0.1, 0.0, 0.0],
            vision_gain: 0.5,
        };
        let mut chassis = SimChassis::new(Pose2d::new(1.0, 2.0, 0.0), config);
        for _ in 0..50 {
            chassis.step(0.02);
        }
        assert!((chassis.estimate_error() - 0.1).abs() < 1e-4);

        let measurement = VisionMeasurement {
            pose: chassis.true_pose(),
            timestamp_us: 0,
            std_devs: [1.0; 3],
        };
        chassis.add_vision_measurement(&measurement);
        assert!((chassis.estimate_error() - 0.05).abs() < 1e-4);
        assert_eq!(chassis.fused(), 1);
    }

    #[test]
    fn test_displace_keeps_estimate() {
        let chassis = SimChassis::new(Pose2d::new(0.0, 0.0, 0.0), ChassisConfig::default());
        chassis.displace(Pose2d::new(1.0, 0.0, 0.0));
        assert_eq!(chassis.pose(), Pose2d::new(0.0, 0.0, 0.0));
        assert!((chassis.estimate_error() - 1.0).abs() < 1e-6);
    }
}
