//! Tilt Parameter Definitions
//!
//! # Parameters
//!
//! - `TILT_SOFT_LIM` - Soft limit either side of level (degrees)
//! - `TILT_MAX_VEL` - Profile velocity limit (rad/s)
//! - `TILT_MAX_ACC` - Profile acceleration limit (rad/s²)
//! - `TILT_KP` - Position loop proportional gain (V/rad)
//! - `TILT_KS` - Static friction voltage (V)
//! - `TILT_KV` - Velocity feedforward (V per rad/s)
//! - `TILT_TOL` - On-target tolerance (degrees)
//! - `TILT_INTAKE` - Intake preset angle (degrees)

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};
use crate::control::SoftLimits;
use crate::mechanism::TiltConfig;

const DEFAULT_SOFT_LIMIT_DEG: f32 = 60.0;
const DEFAULT_MAX_VELOCITY: f32 = 2.0;
const DEFAULT_MAX_ACCELERATION: f32 = 4.0;
const DEFAULT_KP: f32 = 8.0;
const DEFAULT_KS: f32 = 0.1;
const DEFAULT_KV: f32 = 1.0;
const DEFAULT_TOLERANCE_DEG: f32 = 1.0;
const DEFAULT_INTAKE_DEG: f32 = -20.0;

const MIN_SOFT_LIMIT_DEG: f32 = 45.0;
const MAX_SOFT_LIMIT_DEG: f32 = 90.0;
const MIN_MOTION: f32 = 0.05;
const MAX_VELOCITY: f32 = 10.0;
const MAX_ACCELERATION: f32 = 40.0;
const MAX_KP: f32 = 50.0;
const MAX_KS: f32 = 2.0;
const MAX_KV: f32 = 5.0;
const MIN_TOLERANCE_DEG: f32 = 0.1;
const MAX_TOLERANCE_DEG: f32 = 10.0;

/// Tilt parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct TiltParams {
    pub soft_limit_deg: f32,
    pub max_velocity: f32,
    pub max_acceleration: f32,
    pub kp: f32,
    pub ks: f32,
    pub kv: f32,
    pub tolerance_deg: f32,
    pub intake_deg: f32,
}

impl Default for TiltParams {
    fn default() -> Self {
        Self {
            soft_limit_deg: DEFAULT_SOFT_LIMIT_DEG,
            max_velocity: DEFAULT_MAX_VELOCITY,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            kp: DEFAULT_KP,
            ks: DEFAULT_KS,
            kv: DEFAULT_KV,
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
            intake_deg: DEFAULT_INTAKE_DEG,
        }
    }
}

impl TiltParams {
    /// Register tilt parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = [
            ("TILT_SOFT_LIM", DEFAULT_SOFT_LIMIT_DEG),
            ("TILT_MAX_VEL", DEFAULT_MAX_VELOCITY),
            ("TILT_MAX_ACC", DEFAULT_MAX_ACCELERATION),
            ("TILT_KP", DEFAULT_KP),
            ("TILT_KS", DEFAULT_KS),
            ("TILT_KV", DEFAULT_KV),
            ("TILT_TOL", DEFAULT_TOLERANCE_DEG),
            ("TILT_INTAKE", DEFAULT_INTAKE_DEG),
        ];
        for (name, value) in defaults {
            store.register(name, ParamValue::Float(value), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load tilt parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let soft_limit_deg = load_float(
            store,
            "TILT_SOFT_LIM",
            DEFAULT_SOFT_LIMIT_DEG,
            MIN_SOFT_LIMIT_DEG,
            MAX_SOFT_LIMIT_DEG,
        );
        Self {
            soft_limit_deg,
            max_velocity: load_float(
                store,
                "TILT_MAX_VEL",
                DEFAULT_MAX_VELOCITY,
                MIN_MOTION,
                MAX_VELOCITY,
            ),
            max_acceleration: load_float(
                store,
                "TILT_MAX_ACC",
                DEFAULT_MAX_ACCELERATION,
                MIN_MOTION,
                MAX_ACCELERATION,
            ),
            kp: load_float(store, "TILT_KP", DEFAULT_KP, 0.0, MAX_KP),
            ks: load_float(store, "TILT_KS", DEFAULT_KS, 0.0, MAX_KS),
            kv: load_float(store, "TILT_KV", DEFAULT_KV, 0.0, MAX_KV),
            tolerance_deg: load_float(
                store,
                "TILT_TOL",
                DEFAULT_TOLERANCE_DEG,
                MIN_TOLERANCE_DEG,
                MAX_TOLERANCE_DEG,
            ),
            // Preset has to stay reachable
            intake_deg: load_float(
                store,
                "TILT_INTAKE",
                DEFAULT_INTAKE_DEG,
                -soft_limit_deg,
                soft_limit_deg,
            ),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.soft_limit_deg > 0.0
            && self.max_velocity > 0.0
            && self.max_acceleration > 0.0
            && self.tolerance_deg > 0.0
            && self.intake_deg >= -self.soft_limit_deg
            && self.intake_deg <= self.soft_limit_deg
    }

    /// Apply onto a base configuration
    pub fn to_config(&self, base: &TiltConfig) -> Result<TiltConfig, ParameterError> {
        if !self.is_valid() {
            return Err(ParameterError::Inconsistent("tilt"));
        }
        let mut config = *base;
        config.servo.limits = SoftLimits::symmetric(self.soft_limit_deg.to_radians());
        config.servo.constraints.max_velocity = self.max_velocity;
        config.servo.constraints.max_acceleration = self.max_acceleration;
        config.servo.pid.kp = self.kp;
        config.servo.ks = self.ks;
        config.servo.kv = self.kv;
        config.servo.tolerance = self.tolerance_deg.to_radians();
        config.intake_angle = self.intake_deg.to_radians();
        if !config.is_valid() {
            return Err(ParameterError::Inconsistent("tilt"));
        }
        Ok(config)
    }
}
