//! Turret Parameter Definitions
//!
//! # Parameters
//!
//! - `TUR_SOFT_LIM` - Soft limit either side of centre (degrees)
//! - `TUR_HARD_LIM` - Limit switch angle either side of centre (degrees)
//! - `TUR_MAX_VEL` - Profile velocity limit (rad/s)
//! - `TUR_MAX_ACC` - Profile acceleration limit (rad/s²)
//! - `TUR_KP` - Position loop proportional gain (V/rad)
//! - `TUR_TOL` - On-target tolerance (degrees)
//! - `TUR_IDX_VOLT` - Index search voltage magnitude (V)
//! - `TUR_IDX_DIR` - Index search direction (1 = forward, -1 = reverse)

use super::error::ParameterError;
use super::storage::{load_float, load_int, ParamFlags, ParamValue, ParameterStore};
use crate::control::SoftLimits;
use crate::mechanism::{IndexDirection, TurretConfig};

// --- Defaults ---

const DEFAULT_SOFT_LIMIT_DEG: f32 = 115.0;
const DEFAULT_HARD_LIMIT_DEG: f32 = 120.0;
const DEFAULT_MAX_VELOCITY: f32 = 1.0;
const DEFAULT_MAX_ACCELERATION: f32 = 0.5;
const DEFAULT_KP: f32 = 2.0;
const DEFAULT_TOLERANCE_DEG: f32 = 1.0;
const DEFAULT_INDEX_VOLTAGE: f32 = 2.0;
const DEFAULT_INDEX_DIRECTION: i32 = 1;

// --- Ranges ---

const MIN_SOFT_LIMIT_DEG: f32 = 90.0;
const MAX_SOFT_LIMIT_DEG: f32 = 175.0;

const MIN_HARD_LIMIT_DEG: f32 = 95.0;
const MAX_HARD_LIMIT_DEG: f32 = 180.0;

const MIN_MOTION: f32 = 0.05;
const MAX_VELOCITY: f32 = 10.0;
const MAX_ACCELERATION: f32 = 20.0;

const MIN_KP: f32 = 0.0;
const MAX_KP: f32 = 50.0;

const MIN_TOLERANCE_DEG: f32 = 0.1;
const MAX_TOLERANCE_DEG: f32 = 10.0;

const MIN_INDEX_VOLTAGE: f32 = 0.5;
const MAX_INDEX_VOLTAGE: f32 = 6.0;

/// Turret parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct TurretParams {
    pub soft_limit_deg: f32,
    pub hard_limit_deg: f32,
    pub max_velocity: f32,
    pub max_acceleration: f32,
    pub kp: f32,
    pub tolerance_deg: f32,
    pub index_voltage: f32,
    pub index_direction: IndexDirection,
}

impl Default for TurretParams {
    fn default() -> Self {
        Self {
            soft_limit_deg: DEFAULT_SOFT_LIMIT_DEG,
            hard_limit_deg: DEFAULT_HARD_LIMIT_DEG,
            max_velocity: DEFAULT_MAX_VELOCITY,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            kp: DEFAULT_KP,
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
            index_voltage: DEFAULT_INDEX_VOLTAGE,
            index_direction: IndexDirection::Forward,
        }
    }
}

impl TurretParams {
    /// Register turret parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "TUR_SOFT_LIM",
            ParamValue::Float(DEFAULT_SOFT_LIMIT_DEG),
            ParamFlags::empty(),
        )?;
        // Switch position is a property of the build, not a tuning knob
        store.register(
            "TUR_HARD_LIM",
            ParamValue::Float(DEFAULT_HARD_LIMIT_DEG),
            ParamFlags::READ_ONLY,
        )?;
        store.register(
            "TUR_MAX_VEL",
            ParamValue::Float(DEFAULT_MAX_VELOCITY),
            ParamFlags::empty(),
        )?;
        store.register(
            "TUR_MAX_ACC",
            ParamValue::Float(DEFAULT_MAX_ACCELERATION),
            ParamFlags::empty(),
        )?;
        store.register("TUR_KP", ParamValue::Float(DEFAULT_KP), ParamFlags::empty())?;
        store.register(
            "TUR_TOL",
            ParamValue::Float(DEFAULT_TOLERANCE_DEG),
            ParamFlags::empty(),
        )?;
        store.register(
            "TUR_IDX_VOLT",
            ParamValue::Float(DEFAULT_INDEX_VOLTAGE),
            ParamFlags::empty(),
        )?;
        store.register(
            "TUR_IDX_DIR",
            ParamValue::Int(DEFAULT_INDEX_DIRECTION),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load turret parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let direction = load_int(store, "TUR_IDX_DIR", DEFAULT_INDEX_DIRECTION, -1, 1);
        Self {
            soft_limit_deg: load_float(
                store,
                "TUR_SOFT_LIM",
                DEFAULT_SOFT_LIMIT_DEG,
                MIN_SOFT_LIMIT_DEG,
                MAX_SOFT_LIMIT_DEG,
            ),
            hard_limit_deg: load_float(
                store,
                "TUR_HARD_LIM",
                DEFAULT_HARD_LIMIT_DEG,
                MIN_HARD_LIMIT_DEG,
                MAX_HARD_LIMIT_DEG,
            ),
            max_velocity: load_float(
                store,
                "TUR_MAX_VEL",
                DEFAULT_MAX_VELOCITY,
                MIN_MOTION,
                MAX_VELOCITY,
            ),
            max_acceleration: load_float(
                store,
                "TUR_MAX_ACC",
                DEFAULT_MAX_ACCELERATION,
                MIN_MOTION,
                MAX_ACCELERATION,
            ),
            kp: load_float(store, "TUR_KP", DEFAULT_KP, MIN_KP, MAX_KP),
            tolerance_deg: load_float(
                store,
                "TUR_TOL",
                DEFAULT_TOLERANCE_DEG,
                MIN_TOLERANCE_DEG,
                MAX_TOLERANCE_DEG,
            ),
            index_voltage: load_float(
                store,
                "TUR_IDX_VOLT",
                DEFAULT_INDEX_VOLTAGE,
                MIN_INDEX_VOLTAGE,
                MAX_INDEX_VOLTAGE,
            ),
            index_direction: if direction < 0 {
                IndexDirection::Reverse
            } else {
                IndexDirection::Forward
            },
        }
    }

    /// Validate turret parameters
    pub fn is_valid(&self) -> bool {
        // Soft limits must stay inside the switches
        self.soft_limit_deg < self.hard_limit_deg
            && self.max_velocity > 0.0
            && self.max_acceleration > 0.0
            && self.tolerance_deg > 0.0
    }

    /// Apply onto a base configuration
    pub fn to_config(&self, base: &TurretConfig) -> Result<TurretConfig, ParameterError> {
        if !self.is_valid() {
            return Err(ParameterError::Inconsistent("turret"));
        }
        let mut config = *base;
        config.hard_limit = self.hard_limit_deg.to_radians();
        config.servo.limits = SoftLimits::symmetric(self.soft_limit_deg.to_radians());
        config.servo.constraints.max_velocity = self.max_velocity;
        config.servo.constraints.max_acceleration = self.max_acceleration;
        config.servo.pid.kp = self.kp;
        config.servo.tolerance = self.tolerance_deg.to_radians();
        config.index_search_voltage = self.index_voltage;
        config.index_direction = self.index_direction;
        Ok(config)
    }
}
