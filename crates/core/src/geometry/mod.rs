//! Field geometry
//!
//! Planar chassis poses, 3D field poses and angle helpers shared by the
//! ballistics solver, target selector and vision gate.
//!
//! Conventions:
//! - Field frame: x along the field length, y to the left, z up (meters).
//! - Angles in radians, counter-clockwise positive.
//! - Wrapped angles lie in (-π, π].

use core::f32::consts::{PI, TAU};

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// 3D rigid transform in the field frame (fiducial poses, camera poses).
pub type Pose3d = Isometry3<f32>;

/// 3D point in the field frame (aim points).
pub type Point3d = Point3<f32>;

/// Wrap an angle into (-π, π].
///
/// NaN passes through unchanged.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = libm::fmodf(angle, TAU);
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Build a field pose from a translation and a yaw about +z.
pub fn pose3d(x: f32, y: f32, z: f32, yaw: f32) -> Pose3d {
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw),
    )
}

/// Yaw (rotation about +z) of a 3D pose.
pub fn yaw_of(pose: &Pose3d) -> f32 {
    let (_, _, yaw) = pose.rotation.euler_angles();
    yaw
}

/// Chassis pose on the field floor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose2d {
    /// Field x (meters)
    pub x: f32,
    /// Field y (meters)
    pub y: f32,
    /// Heading (radians, 0 = facing +x)
    pub heading: f32,
}

impl Pose2d {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// Planar distance between two poses, ignoring heading.
    pub fn distance_to(&self, other: &Pose2d) -> f32 {
        libm::hypotf(other.x - self.x, other.y - self.y)
    }

    /// Planar distance to a 3D point, ignoring its height.
    pub fn planar_distance_to(&self, point: &Point3d) -> f32 {
        libm::hypotf(point.x - self.x, point.y - self.y)
    }

    /// Rotate a robot-relative planar offset into the field frame and add it.
    pub fn transform_offset(&self, forward: f32, left: f32) -> (f32, f32) {
        let (sin, cos) = libm::sincosf(self.heading);
        (
            self.x + forward * cos - left * sin,
            self.y + forward * sin + left * cos,
        )
    }

    /// Lift to a 3D pose at floor height.
    pub fn to_pose3d(&self) -> Pose3d {
        pose3d(self.x, self.y, 0.0, self.heading)
    }

    /// Project a 3D pose onto the floor, keeping x, y and yaw.
    pub fn from_pose3d(pose: &Pose3d) -> Self {
        let t = pose.translation.vector;
        Self {
            x: t.x,
            y: t.y,
            heading: wrap_angle(yaw_of(pose)),
        }
    }
}
