//! Flywheel Parameter Definitions
//!
//! Both wheels share one feedforward tuning.
//!
//! # Parameters
//!
//! - `FLY_KS` - Static friction voltage (V)
//! - `FLY_KV` - Velocity gain (V per rad/s)
//! - `FLY_KA` - Acceleration gain (V per rad/s²)
//! - `FLY_TOL` - Ready tolerance (rad/s)
//! - `FLY_LOAD_V` - Feed/flywheel voltage while loading (V)
//! - `FLY_FEED_V` - Feed voltage while shooting (V)
//! - `FLY_CLEAR` - Time before an empty sensor counts as shot (s)

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};
use crate::control::MotorFeedforward;
use crate::mechanism::FlywheelConfig;

const DEFAULT_KS: f32 = 0.2;
const DEFAULT_KV: f32 = 0.02;
const DEFAULT_KA: f32 = 0.005;
const DEFAULT_TOLERANCE: f32 = 10.0;
const DEFAULT_LOAD_VOLTAGE: f32 = -4.0;
const DEFAULT_FEED_VOLTAGE: f32 = 6.0;
const DEFAULT_CLEARANCE: f32 = 0.2;

const MAX_VOLTAGE: f32 = 12.0;

/// Flywheel parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct FlywheelParams {
    pub ks: f32,
    pub kv: f32,
    pub ka: f32,
    pub tolerance: f32,
    pub load_voltage: f32,
    pub feed_voltage: f32,
    pub clearance: f32,
}

impl Default for FlywheelParams {
    fn default() -> Self {
        Self {
            ks: DEFAULT_KS,
            kv: DEFAULT_KV,
            ka: DEFAULT_KA,
            tolerance: DEFAULT_TOLERANCE,
            load_voltage: DEFAULT_LOAD_VOLTAGE,
            feed_voltage: DEFAULT_FEED_VOLTAGE,
            clearance: DEFAULT_CLEARANCE,
        }
    }
}

impl FlywheelParams {
    /// Register flywheel parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register("FLY_KS", ParamValue::Float(DEFAULT_KS), ParamFlags::empty())?;
        store.register("FLY_KV", ParamValue::Float(DEFAULT_KV), ParamFlags::empty())?;
        store.register("FLY_KA", ParamValue::Float(DEFAULT_KA), ParamFlags::empty())?;
        store.register(
            "FLY_TOL",
            ParamValue::Float(DEFAULT_TOLERANCE),
            ParamFlags::empty(),
        )?;
        store.register(
            "FLY_LOAD_V",
            ParamValue::Float(DEFAULT_LOAD_VOLTAGE),
            ParamFlags::empty(),
        )?;
        store.register(
            "FLY_FEED_V",
            ParamValue::Float(DEFAULT_FEED_VOLTAGE),
            ParamFlags::empty(),
        )?;
        store.register(
            "FLY_CLEAR",
            ParamValue::Float(DEFAULT_CLEARANCE),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load flywheel parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            ks: load_float(store, "FLY_KS", DEFAULT_KS, 0.0, 2.0),
            kv: load_float(store, "FLY_KV", DEFAULT_KV, 0.001, 1.0),
            ka: load_float(store, "FLY_KA", DEFAULT_KA, 0.0, 1.0),
            tolerance: load_float(store, "FLY_TOL", DEFAULT_TOLERANCE, 1.0, 100.0),
            load_voltage: load_float(
                store,
                "FLY_LOAD_V",
                DEFAULT_LOAD_VOLTAGE,
                -MAX_VOLTAGE,
                0.0,
            ),
            feed_voltage: load_float(store, "FLY_FEED_V", DEFAULT_FEED_VOLTAGE, 0.0, MAX_VOLTAGE),
            clearance: load_float(store, "FLY_CLEAR", DEFAULT_CLEARANCE, 0.0, 2.0),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kv > 0.0 && self.ka >= 0.0 && self.tolerance > 0.0 && self.clearance >= 0.0
    }

    /// Apply onto a base configuration
    pub fn to_config(&self, base: &FlywheelConfig) -> Result<FlywheelConfig, ParameterError> {
        if !self.is_valid() {
            return Err(ParameterError::Inconsistent("flywheel"));
        }
        let feedforward = MotorFeedforward::new(self.ks, self.kv, self.ka);
        let config = FlywheelConfig {
            top: feedforward,
            bottom: feedforward,
            speed_tolerance: self.tolerance,
            load_voltage: self.load_voltage,
            feed_voltage: self.feed_voltage,
            shot_clearance: self.clearance,
            ..*base
        };
        if !config.is_valid() {
            return Err(ParameterError::Inconsistent("flywheel"));
        }
        Ok(config)
    }
}
