//! Fire-control supervisor types
//!
//! The state enum and tuning for the fire-control state machine. The
//! machine itself lives with the hardware-owning subsystems in the root
//! crate; keeping the states here lets them be matched on and logged by
//! host tools without pulling in any platform code.

use core::f32::consts::PI;

/// Fire-control sequencing state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FireControlState {
    /// Moving turret and tilt to the intake pose (initial state)
    #[default]
    PreparingIntake,
    /// Intake deployed, waiting for a game piece
    Intaking,
    /// Continuously aiming; the idle state
    Tracking,
    /// Timed feed into the flywheels; always runs to completion
    Shooting,
    /// Everything stopped until intake is requested again
    Recovery,
}

impl FireControlState {
    pub fn as_str(self) -> &'static str {
        match self {
            FireControlState::PreparingIntake => "preparing_intake",
            FireControlState::Intaking => "intaking",
            FireControlState::Tracking => "tracking",
            FireControlState::Shooting => "shooting",
            FireControlState::Recovery => "recovery",
        }
    }

    /// States that must not be interrupted by operator requests.
    pub fn must_finish(self) -> bool {
        self == FireControlState::Shooting
    }
}

/// Fire-control tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireControlConfig {
    /// Time the feed runs once a shot starts (s)
    pub shot_duration: f32,
    /// Turret azimuth while preparing to intake (rad)
    pub intake_turret_angle: f32,
}

impl Default for FireControlConfig {
    fn default() -> Self {
        Self {
            shot_duration: 0.5,
            intake_turret_angle: 0.0,
        }
    }
}

impl FireControlConfig {
    pub fn is_valid(&self) -> bool {
        self.shot_duration.is_finite()
            && self.shot_duration > 0.0
            && libm::fabsf(self.intake_turret_angle) <= PI
    }

    pub fn shot_duration_us(&self) -> u64 {
        (self.shot_duration * 1_000_000.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(
            FireControlState::default(),
            FireControlState::PreparingIntake
        );
    }

    #[test]
    fn test_only_shooting_must_finish() {
        assert!(FireControlState::Shooting.must_finish());
        assert!(!FireControlState::Tracking.must_finish());
        assert!(!FireControlState::Intaking.must_finish());
    }

    #[test]
    fn test_config_default_valid() {
        let config = FireControlConfig::default();
        assert!(config.is_valid());
        assert_eq!(config.shot_duration_us(), 500_000);
    }

    #[test]
    fn test_state_names_unique() {
        let states = [
            FireControlState::PreparingIntake,
            FireControlState::Intaking,
            FireControlState::Tracking,
            FireControlState::Shooting,
            FireControlState::Recovery,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in states.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
