//! Mechanism state types

/// Turret absolute-angle reference.
///
/// `NotFound` is the homing "seeking" phase: encoder angles are not
/// trusted and the turret drives slowly towards a limit switch. `Found`
/// is the "indexed" phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexState {
    #[default]
    NotFound,
    Found,
}

impl IndexState {
    pub fn is_found(self) -> bool {
        self == IndexState::Found
    }
}

/// Direction the turret searches for its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexDirection {
    #[default]
    Forward,
    Reverse,
}

impl IndexDirection {
    pub fn sign(self) -> f32 {
        match self {
            IndexDirection::Forward => 1.0,
            IndexDirection::Reverse => -1.0,
        }
    }
}

/// Which turret limit switches are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitContact {
    None,
    Forward,
    Reverse,
    /// Both closed at once: sensor fault
    Both,
}

impl LimitContact {
    pub fn from_switches(forward: bool, reverse: bool) -> Self {
        match (forward, reverse) {
            (false, false) => LimitContact::None,
            (true, false) => LimitContact::Forward,
            (false, true) => LimitContact::Reverse,
            (true, true) => LimitContact::Both,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LimitContact::None => "none",
            LimitContact::Forward => "forward",
            LimitContact::Reverse => "reverse",
            LimitContact::Both => "both",
        }
    }
}

/// What the flywheel feed (neck) roller is doing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedState {
    #[default]
    Idle,
    /// Pulling a game piece in from the intake
    Loading,
    /// Pushing the loaded piece into the spinning wheels
    Shooting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_contact_from_switches() {
        assert_eq!(LimitContact::from_switches(false, false), LimitContact::None);
        assert_eq!(LimitContact::from_switches(true, false), LimitContact::Forward);
        assert_eq!(LimitContact::from_switches(false, true), LimitContact::Reverse);
        assert_eq!(LimitContact::from_switches(true, true), LimitContact::Both);
    }

    #[test]
    fn test_index_defaults() {
        assert_eq!(IndexState::default(), IndexState::NotFound);
        assert!(!IndexState::default().is_found());
        assert_eq!(IndexDirection::Reverse.sign(), -1.0);
        assert_eq!(FeedState::default(), FeedState::Idle);
    }
}
