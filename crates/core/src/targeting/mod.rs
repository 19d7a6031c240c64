//! Target selection
//!
//! Picks the aim point for the current tick: the nearest of the alliance's
//! grid fiducials, offset (in the fiducial's own frame) to the scoring node
//! for the selected goal tier. Only the low tier uses the column
//! preference; the upper tiers aim at the node directly behind the tag.
//!
//! A missing fiducial pose is reported as an error rather than guessed, so
//! the caller can hold its previous solution.

pub mod layout;

pub use layout::{FiducialLayout, FieldLayout, MAX_FIDUCIALS};

use heapless::Vec;
use nalgebra::Point3;

use crate::ballistics::{GoalHeight, GridColumn};
use crate::geometry::{Point3d, Pose2d, Pose3d};

/// Maximum grid fiducials per alliance
pub const MAX_GRID_FIDUCIALS: usize = 4;

/// Alliance colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alliance {
    #[default]
    Red,
    Blue,
}

impl Alliance {
    pub fn as_str(self) -> &'static str {
        match self {
            Alliance::Red => "red",
            Alliance::Blue => "blue",
        }
    }
}

/// Target selection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError {
    /// No grid fiducials configured for the alliance
    NoFiducials,
    /// The layout has no pose for this fiducial id
    MissingFiducialPose(u8),
}

impl core::fmt::Display for TargetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TargetError::NoFiducials => write!(f, "no grid fiducials for alliance"),
            TargetError::MissingFiducialPose(id) => {
                write!(f, "no pose for fiducial {}", id)
            }
        }
    }
}

/// Node offset in the fiducial frame (x out of the tag face, y to the
/// tag's left, z up), meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeOffset {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl NodeOffset {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Target selector configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetingConfig {
    pub red_fiducials: Vec<u8, MAX_GRID_FIDUCIALS>,
    pub blue_fiducials: Vec<u8, MAX_GRID_FIDUCIALS>,
    pub high_offset: NodeOffset,
    pub mid_offset: NodeOffset,
    pub low_offset: NodeOffset,
    /// Lateral spacing between low-tier columns (m)
    pub column_spacing: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        let mut red_fiducials = Vec::new();
        let mut blue_fiducials = Vec::new();
        for (red, blue) in [(1, 6), (2, 7), (3, 8)] {
            let _ = red_fiducials.push(red);
            let _ = blue_fiducials.push(blue);
        }
        Self {
            red_fiducials,
            blue_fiducials,
            high_offset: NodeOffset::new(-0.80, 0.0, 0.44),
            mid_offset: NodeOffset::new(-0.43, 0.0, 0.10),
            low_offset: NodeOffset::new(-0.10, 0.0, -0.36),
            column_spacing: 0.56,
        }
    }
}

impl TargetingConfig {
    pub fn fiducials(&self, alliance: Alliance) -> &[u8] {
        match alliance {
            Alliance::Red => &self.red_fiducials,
            Alliance::Blue => &self.blue_fiducials,
        }
    }

    pub fn offset(&self, goal: GoalHeight) -> NodeOffset {
        match goal {
            GoalHeight::High => self.high_offset,
            GoalHeight::Mid => self.mid_offset,
            GoalHeight::Low => self.low_offset,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.red_fiducials.is_empty()
            && !self.blue_fiducials.is_empty()
            && self.column_spacing.is_finite()
            && self.column_spacing >= 0.0
    }
}

/// Aim point chosen for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub fiducial_id: u8,
    pub position: Point3d,
}

#[derive(Clone, Debug, Default)]
pub struct TargetSelector {
    config: TargetingConfig,
}

impl TargetSelector {
    pub fn new(config: TargetingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    /// Nearest alliance grid fiducial to `pose`, by planar distance.
    ///
    /// Fiducials the layout has no pose for are skipped. Fails with the
    /// first missing id only when none of the alliance's fiducials remain.
    pub fn nearest_fiducial<L: FieldLayout + ?Sized>(
        &self,
        layout: &L,
        alliance: Alliance,
        pose: &Pose2d,
    ) -> Result<(u8, Pose3d), TargetError> {
        let mut best: Option<(u8, Pose3d, f32)> = None;
        let mut missing = None;
        for &id in self.config.fiducials(alliance) {
            let Some(tag) = layout.fiducial_pose(id) else {
                missing.get_or_insert(id);
                continue;
            };
            let t = tag.translation.vector;
            let distance = pose.planar_distance_to(&Point3::new(t.x, t.y, t.z));
            match best {
                Some((_, _, d)) if d <= distance => {}
                _ => best = Some((id, tag, distance)),
            }
        }
        match (best, missing) {
            (Some((id, tag, _)), _) => Ok((id, tag)),
            (None, Some(id)) => Err(TargetError::MissingFiducialPose(id)),
            (None, None) => Err(TargetError::NoFiducials),
        }
    }

    /// Aim point for the selected goal tier and column.
    pub fn select<L: FieldLayout + ?Sized>(
        &self,
        layout: &L,
        alliance: Alliance,
        pose: &Pose2d,
        goal: GoalHeight,
        column: GridColumn,
    ) -> Result<Target, TargetError> {
        let (fiducial_id, tag) = self.nearest_fiducial(layout, alliance, pose)?;
        let offset = self.config.offset(goal);
        // Tag +y is the driver's left on both alliances
        let lateral = match goal {
            GoalHeight::Low => -column.sign() * self.config.column_spacing,
            GoalHeight::High | GoalHeight::Mid => 0.0,
        };
        let local = Point3::new(offset.x, offset.y + lateral, offset.z);
        Ok(Target {
            fiducial_id,
            position: tag.transform_point(&local),
        })
    }
}
