//! Operator aiming preferences

/// Goal tier to aim at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GoalHeight {
    #[default]
    High,
    Mid,
    Low,
}

impl GoalHeight {
    /// One tier higher, saturating at `High`.
    pub fn up(self) -> Self {
        match self {
            GoalHeight::Low => GoalHeight::Mid,
            GoalHeight::Mid | GoalHeight::High => GoalHeight::High,
        }
    }

    /// One tier lower, saturating at `Low`.
    pub fn down(self) -> Self {
        match self {
            GoalHeight::High => GoalHeight::Mid,
            GoalHeight::Mid | GoalHeight::Low => GoalHeight::Low,
        }
    }

    /// Classify an aim point by its field height (meters).
    pub fn from_target_height(z: f32) -> Self {
        if z < 0.30 {
            GoalHeight::Low
        } else if z < 0.60 {
            GoalHeight::Mid
        } else {
            GoalHeight::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GoalHeight::High => "high",
            GoalHeight::Mid => "mid",
            GoalHeight::Low => "low",
        }
    }
}

/// Grid column, as seen from the driver station.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridColumn {
    Left,
    #[default]
    Centre,
    Right,
}

impl GridColumn {
    /// One column left, saturating at `Left`.
    pub fn left(self) -> Self {
        match self {
            GridColumn::Right => GridColumn::Centre,
            GridColumn::Centre | GridColumn::Left => GridColumn::Left,
        }
    }

    /// One column right, saturating at `Right`.
    pub fn right(self) -> Self {
        match self {
            GridColumn::Left => GridColumn::Centre,
            GridColumn::Centre | GridColumn::Right => GridColumn::Right,
        }
    }

    /// -1 for left, 0 for centre, +1 for right.
    pub fn sign(self) -> f32 {
        match self {
            GridColumn::Left => -1.0,
            GridColumn::Centre => 0.0,
            GridColumn::Right => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_height_saturates() {
        assert_eq!(GoalHeight::Low.up(), GoalHeight::Mid);
        assert_eq!(GoalHeight::Mid.up(), GoalHeight::High);
        assert_eq!(GoalHeight::High.up(), GoalHeight::High);
        assert_eq!(GoalHeight::High.down(), GoalHeight::Mid);
        assert_eq!(GoalHeight::Low.down(), GoalHeight::Low);
    }

    #[test]
    fn test_grid_column_saturates() {
        assert_eq!(GridColumn::Centre.left(), GridColumn::Left);
        assert_eq!(GridColumn::Left.left(), GridColumn::Left);
        assert_eq!(GridColumn::Left.right(), GridColumn::Centre);
        assert_eq!(GridColumn::Right.right(), GridColumn::Right);
    }

    #[test]
    fn test_from_target_height_boundaries() {
        assert_eq!(GoalHeight::from_target_height(0.0), GoalHeight::Low);
        assert_eq!(GoalHeight::from_target_height(0.29), GoalHeight::Low);
        assert_eq!(GoalHeight::from_target_height(0.30), GoalHeight::Mid);
        assert_eq!(GoalHeight::from_target_height(0.59), GoalHeight::Mid);
        assert_eq!(GoalHeight::from_target_height(0.60), GoalHeight::High);
        assert_eq!(GoalHeight::from_target_height(1.2), GoalHeight::High);
    }

    #[test]
    fn test_column_sign() {
        assert_eq!(GridColumn::Left.sign(), -1.0);
        assert_eq!(GridColumn::Centre.sign(), 0.0);
        assert_eq!(GridColumn::Right.sign(), 1.0);
    }
}
