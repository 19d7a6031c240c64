//! Mechanism configuration
//!
//! Calibrated defaults for every actuated mechanism on the shooter. Each
//! config is built once, validated with `is_valid()`, and handed to its
//! subsystem by value. Tunable fields can be overridden through the
//! parameter store (see [`crate::parameters`]).

pub mod types;

pub use types::{FeedState, IndexDirection, IndexState, LimitContact};

use core::f32::consts::{FRAC_PI_2, PI};

use crate::control::{MotionConstraints, MotorFeedforward, PidConfig, ServoConfig, SoftLimits};

/// Control loop period (s)
pub const TICK_PERIOD: f32 = 0.02;

const DEG: f32 = PI / 180.0;

/// Turret azimuth axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretConfig {
    /// Profiled servo tuning; soft limits sit inside `hard_limit`
    pub servo: ServoConfig,
    /// Angle of each limit switch (rad), written to the encoder on contact
    pub hard_limit: f32,
    /// Voltage magnitude while seeking the index
    pub index_search_voltage: f32,
    pub index_direction: IndexDirection,
    /// Switch inputs read low when pressed
    pub switches_active_low: bool,
}

impl Default for TurretConfig {
    fn default() -> Self {
        let hard_limit = 120.0 * DEG;
        Self {
            servo: ServoConfig {
                constraints: MotionConstraints::new(1.0, 0.5),
                limits: SoftLimits::symmetric(115.0 * DEG),
                pid: PidConfig::p(2.0),
                ks: 0.0,
                kv: 0.0,
                tolerance: 1.0 * DEG,
                max_voltage: 12.0,
            },
            hard_limit,
            index_search_voltage: 2.0,
            index_direction: IndexDirection::Forward,
            switches_active_low: true,
        }
    }
}

impl TurretConfig {
    /// Soft limits must sit strictly inside the switches and wider than
    /// ±90° so every azimuth has a reachable direct or flipped solution.
    pub fn is_valid(&self) -> bool {
        let limits = &self.servo.limits;
        self.servo.is_valid()
            && self.hard_limit.is_finite()
            && limits.forward < self.hard_limit
            && limits.reverse > -self.hard_limit
            && limits.forward >= FRAC_PI_2
            && limits.reverse <= -FRAC_PI_2
            && self.index_search_voltage > 0.0
            && self.index_search_voltage <= self.servo.max_voltage
    }

    /// Encoder value to force when a switch closes.
    pub fn limit_angle(&self, contact: LimitContact) -> Option<f32> {
        match contact {
            LimitContact::Forward => Some(self.hard_limit),
            LimitContact::Reverse => Some(-self.hard_limit),
            LimitContact::None | LimitContact::Both => None,
        }
    }
}

/// Shooter tilt axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltConfig {
    pub servo: ServoConfig,
    /// Preset that lines the shooter up with the intake (rad)
    pub intake_angle: f32,
    /// Raw readings above this are folded down by π (rad)
    pub unwrap_upper: f32,
    /// Raw readings below this are folded up by π (rad)
    pub unwrap_lower: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            servo: ServoConfig {
                constraints: MotionConstraints::new(2.0, 4.0),
                limits: SoftLimits::symmetric(60.0 * DEG),
                pid: PidConfig::p(8.0),
                ks: 0.1,
                kv: 1.0,
                tolerance: 1.0 * DEG,
                max_voltage: 12.0,
            },
            intake_angle: -20.0 * DEG,
            unwrap_upper: 100.0 * DEG,
            unwrap_lower: -100.0 * DEG,
        }
    }
}

impl TiltConfig {
    pub fn is_valid(&self) -> bool {
        self.servo.is_valid()
            && self.servo.limits.contains(self.intake_angle)
            && self.unwrap_lower < self.servo.limits.reverse
            && self.unwrap_upper > self.servo.limits.forward
            // A folded reading must land back inside the band
            && self.unwrap_upper - self.unwrap_lower <= 2.0 * PI
    }

    /// Fold a raw absolute-encoder reading into the operating range.
    pub fn unwrap(&self, raw: f32) -> f32 {
        if raw > self.unwrap_upper {
            raw - PI
        } else if raw < self.unwrap_lower {
            raw + PI
        } else {
            raw
        }
    }
}

/// Top/bottom flywheels and the feed roller behind them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlywheelConfig {
    pub top: MotorFeedforward,
    pub bottom: MotorFeedforward,
    /// Both wheels must be within this of target to be ready (rad/s)
    pub speed_tolerance: f32,
    pub max_voltage: f32,
    /// Feed roller and flywheel voltage while loading (negative pulls in)
    pub load_voltage: f32,
    /// Feed roller voltage while shooting
    pub feed_voltage: f32,
    /// Shooting time before an empty sensor counts as shot (s)
    pub shot_clearance: f32,
    /// Loaded sensor reads low when a piece is present
    pub sensor_active_low: bool,
}

impl Default for FlywheelConfig {
    fn default() -> Self {
        Self {
            top: MotorFeedforward::new(0.2, 0.02, 0.005),
            bottom: MotorFeedforward::new(0.2, 0.02, 0.005),
            speed_tolerance: 10.0,
            max_voltage: 12.0,
            load_voltage: -4.0,
            feed_voltage: 6.0,
            shot_clearance: 0.2,
            sensor_active_low: true,
        }
    }
}

impl FlywheelConfig {
    pub fn is_valid(&self) -> bool {
        self.top.is_valid()
            && self.bottom.is_valid()
            && self.speed_tolerance > 0.0
            && self.max_voltage > 0.0
            && libm::fabsf(self.load_voltage) <= self.max_voltage
            && libm::fabsf(self.feed_voltage) <= self.max_voltage
            && self.shot_clearance >= 0.0
    }
}

/// Ground intake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntakeConfig {
    /// Front roller voltage while deployed
    pub front_voltage: f32,
    /// Tunnel roller voltage while deployed
    pub tunnel_voltage: f32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            front_voltage: 9.6,
            tunnel_voltage: 9.6,
        }
    }
}

impl IntakeConfig {
    pub fn is_valid(&self) -> bool {
        self.front_voltage.is_finite()
            && self.tunnel_voltage.is_finite()
            && libm::fabsf(self.front_voltage) <= 12.0
            && libm::fabsf(self.tunnel_voltage) <= 12.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(TurretConfig::default().is_valid());
        assert!(TiltConfig::default().is_valid());
        assert!(FlywheelConfig::default().is_valid());
        assert!(IntakeConfig::default().is_valid());
    }

    #[test]
    fn test_turret_soft_limits_inside_hard_limits() {
        let config = TurretConfig::default();
        let limits = config.servo.limits;
        assert!((config.hard_limit - limits.forward - 5.0 * DEG).abs() < 1e-6);
        assert!((limits.reverse + config.hard_limit - 5.0 * DEG).abs() < 1e-6);
    }

    #[test]
    fn test_turret_narrow_limits_invalid() {
        let mut config = TurretConfig::default();
        config.servo.limits = SoftLimits::symmetric(80.0 * DEG);
        assert!(!config.is_valid());
    }

    #[test]
    fn test_turret_limit_angle() {
        let config = TurretConfig::default();
        assert_eq!(config.limit_angle(LimitContact::Forward), Some(config.hard_limit));
        assert_eq!(config.limit_angle(LimitContact::Reverse), Some(-config.hard_limit));
        assert_eq!(config.limit_angle(LimitContact::Both), None);
        assert_eq!(config.limit_angle(LimitContact::None), None);
    }

    #[test]
    fn test_tilt_unwrap() {
        let config = TiltConfig::default();
        assert_eq!(config.unwrap(0.3), 0.3);
        let high = 170.0 * DEG;
        assert!((config.unwrap(high) - (high - PI)).abs() < 1e-6);
        let low = -175.0 * DEG;
        assert!((config.unwrap(low) - (low + PI)).abs() < 1e-6);
        // Unwrapped values fall inside the unwrap band
        for deg in [-179.0_f32, -120.0, -60.0, 0.0, 60.0, 120.0, 179.0] {
            let v = config.unwrap(deg * DEG);
            assert!(v >= config.unwrap_lower && v <= config.unwrap_upper);
        }
    }

    #[test]
    fn test_tilt_covers_negated_table_angles() {
        // Flipped shots negate tilt; both signs must be reachable
        let config = TiltConfig::default();
        assert!(config.servo.limits.contains(45.0 * DEG));
        assert!(config.servo.limits.contains(-45.0 * DEG));
    }
}
