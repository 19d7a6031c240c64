//! Simulated fiducial camera
//!
//! Renders the field layout from the true robot pose and true turret angle,
//! adds Gaussian translation noise and a random ambiguity, and publishes a
//! new frame at a fixed rate. Between captures the previous frame is
//! returned again, like a real pipeline polled faster than it runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use fire_control::subsystems::Camera;
use fire_control_core::geometry::Pose3d;
use fire_control_core::targeting::{FiducialLayout, FieldLayout};
use fire_control_core::traits::TimeSource;
use fire_control_core::vision::{CameraMount, TargetDetection, VisionFrame};
use nalgebra::{Point3, Translation3};

use crate::chassis::SimChassis;
use crate::clock::SimClock;
use crate::error::SimulationError;
use crate::hardware::SimMotor;

/// Highest fiducial id searched when rendering
const MAX_FIDUCIAL_ID: u8 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub name: &'static str,
    pub mount: CameraMount,
    /// Time between captures (µs)
    pub period_us: u64,
    /// Capture-to-delivery delay (µs)
    pub latency_us: u64,
    /// Farthest fiducial still detected (m)
    pub max_range: f32,
    /// Half the horizontal field of view (rad)
    pub half_fov: f32,
    /// Translation noise standard deviation per axis (m)
    pub noise_std: f32,
    /// Ambiguity is drawn uniformly from `[0, max_ambiguity)`
    pub max_ambiguity: f32,
    pub seed: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            name: "turret",
            mount: CameraMount::default(),
            period_us: 40_000,
            latency_us: 30_000,
            max_range: 6.0,
            half_fov: 35.0_f32.to_radians(),
            noise_std: 0.02,
            max_ambiguity: 0.3,
            seed: 7,
        }
    }
}

pub struct SimCamera {
    config: CameraConfig,
    chassis: SimChassis,
    turret: SimMotor,
    clock: SimClock,
    layout: FiducialLayout,
    rng: StdRng,
    noise: Normal<f32>,
    frame: VisionFrame,
    next_capture_us: u64,
}

impl SimCamera {
    pub fn new(
        config: CameraConfig,
        chassis: SimChassis,
        turret: SimMotor,
        clock: SimClock,
        layout: FiducialLayout,
    ) -> Result<Self, SimulationError> {
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|_| SimulationError::InvalidConfig("camera noise"))?;
        if config.period_us == 0
            || config.max_range <= 0.0
            || config.half_fov <= 0.0
            || config.max_ambiguity <= 0.0
        {
            return Err(SimulationError::InvalidConfig("camera"));
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            chassis,
            turret,
            clock,
            layout,
            rng,
            noise,
            frame: VisionFrame::default(),
            next_capture_us: 0,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Camera pose in the field frame right now.
    pub fn field_pose(&self) -> Pose3d {
        let robot = self.chassis.true_pose().to_pose3d();
        robot * self.config.mount.robot_to_camera(self.turret.true_position())
    }

    fn capture(&mut self, now_us: u64) -> VisionFrame {
        let camera = self.field_pose();
        let mut frame = VisionFrame::empty(now_us.saturating_sub(self.config.latency_us));

        for id in 1..=MAX_FIDUCIAL_ID {
            let Some(tag) = self.layout.fiducial_pose(id) else {
                continue;
            };
            // Printed side must face the camera
            let camera_in_tag =
                tag.inverse_transform_point(&Point3::from(camera.translation.vector));
            if camera_in_tag.x <= 0.0 {
                continue;
            }
            let seen = camera.inverse() * tag;
            let t = seen.translation.vector;
            let range = t.norm();
            let bearing = t.y.atan2(t.x);
            if t.x <= 0.0 || range > self.config.max_range || bearing.abs() > self.config.half_fov {
                continue;
            }

            let mut noisy = seen;
            noisy.translation = Translation3::new(
                t.x + self.noise.sample(&mut self.rng),
                t.y + self.noise.sample(&mut self.rng),
                t.z + self.noise.sample(&mut self.rng),
            );
            let detection = TargetDetection {
                fiducial_id: id,
                camera_to_target: noisy,
                ambiguity: self.rng.gen_range(0.0..self.config.max_ambiguity),
                yaw: bearing,
                area: 100.0 / (1.0 + range * range),
            };
            if frame.targets.push(detection).is_err() {
                break;
            }
        }
        frame
    }
}

impl Camera for SimCamera {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn latest_frame(&mut self) -> VisionFrame {
        let now_us = self.clock.now_us();
        if now_us >= self.next_capture_us {
            self.frame = self.capture(now_us);
            self.next_capture_us = now_us + self.config.period_us;
        }
        self.frame.clone()
    }
}
