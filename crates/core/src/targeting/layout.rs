//! Field fiducial layout
//!
//! Fixed poses of the field's uniquely identified markers. The built-in
//! layout is the 2023 field; other layouts can be supplied through the
//! `FieldLayout` trait.

use heapless::Vec;

use crate::geometry::{pose3d, Pose3d};

/// Maximum fiducials in a `FiducialLayout`
pub const MAX_FIDUCIALS: usize = 16;

/// Fiducial pose lookup.
pub trait FieldLayout {
    /// Pose of fiducial `id` in the field frame, if the layout has it.
    fn fiducial_pose(&self, id: u8) -> Option<Pose3d>;
}

/// Table-backed field layout.
#[derive(Clone, Debug, Default)]
pub struct FiducialLayout {
    fiducials: Vec<(u8, Pose3d), MAX_FIDUCIALS>,
}

impl FiducialLayout {
    pub fn new() -> Self {
        Self {
            fiducials: Vec::new(),
        }
    }

    /// Add or replace a fiducial. Returns `false` when the layout is full.
    pub fn insert(&mut self, id: u8, pose: Pose3d) -> bool {
        if let Some(entry) = self.fiducials.iter_mut().find(|(fid, _)| *fid == id) {
            entry.1 = pose;
            return true;
        }
        self.fiducials.push((id, pose)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.fiducials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fiducials.is_empty()
    }

    /// 2023 field (ids 1-8). Red grid faces -x, blue grid faces +x.
    pub fn charged_up_2023() -> Self {
        use core::f32::consts::PI;

        let mut layout = Self::new();
        let tags = [
            (1, 15.513558, 1.071626, 0.462788, PI),
            (2, 15.513558, 2.748026, 0.462788, PI),
            (3, 15.513558, 4.424426, 0.462788, PI),
            (4, 16.178784, 6.749796, 0.695452, PI),
            (5, 0.36195, 6.749796, 0.695452, 0.0),
            (6, 1.02743, 4.424426, 0.462788, 0.0),
            (7, 1.02743, 2.748026, 0.462788, 0.0),
            (8, 1.02743, 1.071626, 0.462788, 0.0),
        ];
        for (id, x, y, z, yaw) in tags {
            layout.insert(id, pose3d(x, y, z, yaw));
        }
        layout
    }

    /// Field length inferred from grid fiducials 1 and 8; `None` if either
    /// is missing.
    pub fn field_length(&self) -> Option<f32> {
        let red = self.fiducial_pose(1)?;
        let blue = self.fiducial_pose(8)?;
        // Grid tags sit the same depth from each end wall
        let span = red.translation.vector.x - blue.translation.vector.x;
        Some(span + 2.0 * blue.translation.vector.x)
    }
}

impl FieldLayout for FiducialLayout {
    fn fiducial_pose(&self, id: u8) -> Option<Pose3d> {
        self.fiducials
            .iter()
            .find(|(fid, _)| *fid == id)
            .map(|(_, pose)| *pose)
    }
}
