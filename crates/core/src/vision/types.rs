//! Vision data types

use heapless::Vec;
use nalgebra::{Translation3, UnitQuaternion, Vector3};

use crate::geometry::{Pose2d, Pose3d};

/// Maximum detections per frame
pub const MAX_TARGETS: usize = 8;

/// One fiducial detected in a camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetDetection {
    pub fiducial_id: u8,
    /// Best-fit transform from camera to fiducial
    pub camera_to_target: Pose3d,
    /// Pose ambiguity ratio, 0 (certain) to 1
    pub ambiguity: f32,
    /// Horizontal angle of the fiducial in the image (rad)
    pub yaw: f32,
    /// Fraction of the image covered by the fiducial (0-100)
    pub area: f32,
}

/// Latest result from one camera.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisionFrame {
    /// Capture time on the robot clock (µs)
    pub timestamp_us: u64,
    pub targets: Vec<TargetDetection, MAX_TARGETS>,
}

impl VisionFrame {
    pub fn empty(timestamp_us: u64) -> Self {
        Self {
            timestamp_us,
            targets: Vec::new(),
        }
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// Accepted robot pose to hand to the chassis pose estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisionMeasurement {
    pub pose: Pose2d,
    pub timestamp_us: u64,
    /// Standard deviations (x m, y m, heading rad)
    pub std_devs: [f32; 3],
}

/// Camera placement on the turret.
///
/// The camera rotates with the turret: its pose on the robot is the turret
/// pivot offset, then the turret azimuth about +z, then the fixed mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMount {
    /// Turret pivot relative to robot centre (m)
    pub turret_offset: Vector3<f32>,
    /// Camera pose relative to the turret pivot at zero azimuth
    pub mount: Pose3d,
}

impl Default for CameraMount {
    fn default() -> Self {
        Self {
            turret_offset: Vector3::zeros(),
            mount: Pose3d::identity(),
        }
    }
}

impl CameraMount {
    /// Robot-to-camera transform at the given turret azimuth.
    pub fn robot_to_camera(&self, turret_angle: f32) -> Pose3d {
        let turret = Pose3d::from_parts(
            Translation3::from(self.turret_offset),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), turret_angle),
        );
        turret * self.mount
    }

    /// Field pose of the robot implied by seeing `tag_pose` through
    /// `camera_to_target`.
    pub fn robot_pose_from_detection(
        &self,
        tag_pose: &Pose3d,
        camera_to_target: &Pose3d,
        turret_angle: f32,
    ) -> Pose3d {
        let camera_to_robot = self.robot_to_camera(turret_angle).inverse();
        tag_pose * camera_to_target.inverse() * camera_to_robot
    }
}
