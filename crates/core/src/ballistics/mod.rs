//! Ballistics solver
//!
//! Maps a chassis pose and an aim point to a complete firing solution:
//! turret azimuth, shooter tilt, both flywheel speeds and the range used
//! for the table lookup.
//!
//! The solve is a pure function of its inputs. The only state it needs
//! from the mechanism (where the turret currently points, and its soft
//! limits) is passed in by the caller so the flip hysteresis can be
//! evaluated without the solver owning any hardware.
//!
//! # Algorithm
//!
//! 1. Turret pivot = robot pose translated by the turret offset, rotated
//!    by the robot heading.
//! 2. Range = planar distance from pivot to aim point.
//! 3. Raw azimuth = atan2(Δy, Δx) - heading, wrapped to (-π, π].
//! 4. Tilt and speeds interpolated from the goal tier's table at range.
//! 5. Flip rule applied to (raw azimuth, tilt).

pub mod flip;
pub mod goal;
pub mod table;

pub use flip::{choose_aim, flipped_azimuth, AimDecision};
pub use goal::{GoalHeight, GridColumn};
pub use table::{BallisticsTable, BallisticsTables, TableError, TableRow, MAX_TABLE_ROWS};

use crate::control::SoftLimits;
use crate::geometry::{wrap_angle, Point3d, Pose2d};

/// Firing solution for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BallisticsSolution {
    /// Turret azimuth relative to robot forward (rad)
    pub turret_angle: f32,
    /// Shooter tilt (rad)
    pub tilt_angle: f32,
    /// Top flywheel speed (rad/s)
    pub top_flywheel_speed: f32,
    /// Bottom flywheel speed (rad/s)
    pub bottom_flywheel_speed: f32,
    /// Planar distance from turret pivot to aim point (m)
    pub range: f32,
    /// True if the solution fires out of the mirrored side
    pub flipped: bool,
}

/// Solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct BallisticsConfig {
    /// Turret pivot offset ahead of the robot centre (m)
    pub turret_offset_forward: f32,
    /// Turret pivot offset left of the robot centre (m)
    pub turret_offset_left: f32,
    pub tables: BallisticsTables,
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self {
            turret_offset_forward: 0.0,
            turret_offset_left: 0.0,
            tables: BallisticsTables::default(),
        }
    }
}

impl BallisticsConfig {
    pub fn is_valid(&self) -> bool {
        self.turret_offset_forward.is_finite() && self.turret_offset_left.is_finite()
    }
}

#[derive(Clone, Debug, Default)]
pub struct BallisticsSolver {
    config: BallisticsConfig,
}

impl BallisticsSolver {
    pub fn new(config: BallisticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BallisticsConfig {
        &self.config
    }

    /// Turret pivot position on the field.
    pub fn turret_pivot(&self, robot_pose: &Pose2d) -> (f32, f32) {
        robot_pose.transform_offset(
            self.config.turret_offset_forward,
            self.config.turret_offset_left,
        )
    }

    /// Raw (unflipped) azimuth and range from the turret pivot to `target`.
    pub fn azimuth_and_range(&self, robot_pose: &Pose2d, target: &Point3d) -> (f32, f32) {
        let (px, py) = self.turret_pivot(robot_pose);
        let dx = target.x - px;
        let dy = target.y - py;
        let range = libm::hypotf(dx, dy);
        let azimuth = wrap_angle(libm::atan2f(dy, dx) - robot_pose.heading);
        (azimuth, range)
    }

    /// Full firing solution. `was_flipped` carries the previous solution's
    /// flip state for the hysteresis band.
    pub fn solve(
        &self,
        robot_pose: &Pose2d,
        target: &Point3d,
        goal: GoalHeight,
        turret_limits: &SoftLimits,
        was_flipped: bool,
    ) -> BallisticsSolution {
        let (raw_azimuth, range) = self.azimuth_and_range(robot_pose, target);
        let row = self.config.tables.for_height(goal).lookup(range);
        let aim = choose_aim(raw_azimuth, row.tilt, turret_limits, was_flipped);

        BallisticsSolution {
            turret_angle: aim.turret_angle,
            tilt_angle: aim.tilt_angle,
            top_flywheel_speed: row.top_speed,
            bottom_flywheel_speed: row.bottom_speed,
            range,
            flipped: aim.flipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    const EPS: f32 = 1e-4;

    fn limits() -> SoftLimits {
        SoftLimits::symmetric(115.0 * PI / 180.0)
    }

    #[test]
    fn test_target_straight_ahead_high_row() {
        let solver = BallisticsSolver::default();
        let pose = Pose2d::new(0.0, 0.0, 0.0);
        let target = Point3d::new(5.0, 0.0, 0.0);
        let bs = solver.solve(&pose, &target, GoalHeight::High, &limits(), false);

        let row = solver
            .config()
            .tables
            .high
            .rows()
            .iter()
            .find(|r| r.range == 5.0)
            .copied()
            .unwrap();
        assert!(bs.turret_angle.abs() < EPS);
        assert_eq!(bs.tilt_angle, row.tilt);
        assert_eq!(bs.top_flywheel_speed, row.top_speed);
        assert_eq!(bs.bottom_flywheel_speed, row.bottom_speed);
        assert!((bs.range - 5.0).abs() < EPS);
        assert!(!bs.flipped);
    }

    #[test]
    fn test_azimuth_relative_to_heading() {
        let solver = BallisticsSolver::default();
        let pose = Pose2d::new(1.0, 1.0, PI / 2.0);
        let target = Point3d::new(1.0, 3.0, 1.0);
        let (azimuth, range) = solver.azimuth_and_range(&pose, &target);
        assert!(azimuth.abs() < EPS);
        assert!((range - 2.0).abs() < EPS);

        let target_left = Point3d::new(-1.0, 1.0, 1.0);
        let (azimuth, _) = solver.azimuth_and_range(&pose, &target_left);
        assert!((azimuth - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_turret_offset_moves_pivot() {
        let solver = BallisticsSolver::new(BallisticsConfig {
            turret_offset_forward: 0.5,
            ..BallisticsConfig::default()
        });
        let pose = Pose2d::new(0.0, 0.0, PI / 2.0);
        let (px, py) = solver.turret_pivot(&pose);
        assert!(px.abs() < EPS);
        assert!((py - 0.5).abs() < EPS);
        let (_, range) = solver.azimuth_and_range(&pose, &Point3d::new(0.0, 3.0, 0.0));
        assert!((range - 2.5).abs() < EPS);
    }

    #[test]
    fn test_target_behind_is_flipped() {
        let solver = BallisticsSolver::default();
        let pose = Pose2d::new(5.0, 0.0, 0.0);
        let target = Point3d::new(2.0, 0.0, 1.0);
        let bs = solver.solve(&pose, &target, GoalHeight::Mid, &limits(), false);
        let unflipped = solver.config().tables.mid.lookup(3.0);

        assert!(bs.flipped);
        assert!(limits().contains(bs.turret_angle));
        assert!(bs.turret_angle.abs() < EPS);
        assert!((bs.tilt_angle + unflipped.tilt).abs() < EPS);
    }

    #[test]
    fn test_goal_height_selects_table() {
        let solver = BallisticsSolver::default();
        let pose = Pose2d::default();
        let target = Point3d::new(3.0, 0.0, 0.0);
        let high = solver.solve(&pose, &target, GoalHeight::High, &limits(), false);
        let low = solver.solve(&pose, &target, GoalHeight::Low, &limits(), false);
        assert!(high.tilt_angle != low.tilt_angle);
        assert!(high.top_flywheel_speed > low.top_flywheel_speed);
    }

    #[test]
    fn test_out_of_range_zero_speed() {
        let solver = BallisticsSolver::default();
        let bs = solver.solve(
            &Pose2d::default(),
            &Point3d::new(9.0, 0.0, 1.0),
            GoalHeight::High,
            &limits(),
            false,
        );
        assert_eq!(bs.top_flywheel_speed, 0.0);
        assert_eq!(bs.bottom_flywheel_speed, 0.0);
    }
}
