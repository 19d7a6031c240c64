//! Vision Gate Parameter Definitions
//!
//! # Parameters
//!
//! - `VIS_MAX_LAT` - Maximum frame age (s)
//! - `VIS_MAX_AMB` - Maximum pose ambiguity
//! - `VIS_MAX_YAW` - Maximum |yaw| to target (degrees)
//! - `VIS_MAX_JUMP` - Maximum distance from current estimate (m)
//! - `VIS_REJ_CAP` - Consecutive rejections before forced acceptance
//! - `VIS_FWD` - Forward accepted measurements to the estimator

use super::error::ParameterError;
use super::storage::{load_bool, load_float, load_int, ParamFlags, ParamValue, ParameterStore};
use crate::vision::VisionGateConfig;

const DEFAULT_MAX_LATENCY: f32 = 0.5;
const DEFAULT_MAX_AMBIGUITY: f32 = 0.25;
const DEFAULT_MAX_YAW_DEG: f32 = 20.0;
const DEFAULT_MAX_JUMP: f32 = 1.0;
const DEFAULT_REJECTION_CAP: i32 = 20;
const DEFAULT_FORWARD: bool = true;

/// Vision gate parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct VisionParams {
    pub max_latency: f32,
    pub max_ambiguity: f32,
    pub max_yaw_deg: f32,
    pub max_jump: f32,
    pub rejection_cap: u16,
    pub forward: bool,
}

impl Default for VisionParams {
    fn default() -> Self {
        Self {
            max_latency: DEFAULT_MAX_LATENCY,
            max_ambiguity: DEFAULT_MAX_AMBIGUITY,
            max_yaw_deg: DEFAULT_MAX_YAW_DEG,
            max_jump: DEFAULT_MAX_JUMP,
            rejection_cap: DEFAULT_REJECTION_CAP as u16,
            forward: DEFAULT_FORWARD,
        }
    }
}

impl VisionParams {
    /// Register vision parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "VIS_MAX_LAT",
            ParamValue::Float(DEFAULT_MAX_LATENCY),
            ParamFlags::empty(),
        )?;
        store.register(
            "VIS_MAX_AMB",
            ParamValue::Float(DEFAULT_MAX_AMBIGUITY),
            ParamFlags::empty(),
        )?;
        store.register(
            "VIS_MAX_YAW",
            ParamValue::Float(DEFAULT_MAX_YAW_DEG),
            ParamFlags::empty(),
        )?;
        store.register(
            "VIS_MAX_JUMP",
            ParamValue::Float(DEFAULT_MAX_JUMP),
            ParamFlags::empty(),
        )?;
        store.register(
            "VIS_REJ_CAP",
            ParamValue::Int(DEFAULT_REJECTION_CAP),
            ParamFlags::empty(),
        )?;
        store.register(
            "VIS_FWD",
            ParamValue::Bool(DEFAULT_FORWARD),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load vision parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            max_latency: load_float(store, "VIS_MAX_LAT", DEFAULT_MAX_LATENCY, 0.05, 2.0),
            max_ambiguity: load_float(store, "VIS_MAX_AMB", DEFAULT_MAX_AMBIGUITY, 0.0, 1.0),
            max_yaw_deg: load_float(store, "VIS_MAX_YAW", DEFAULT_MAX_YAW_DEG, 1.0, 90.0),
            max_jump: load_float(store, "VIS_MAX_JUMP", DEFAULT_MAX_JUMP, 0.1, 10.0),
            rejection_cap: load_int(store, "VIS_REJ_CAP", DEFAULT_REJECTION_CAP, 1, 1000) as u16,
            forward: load_bool(store, "VIS_FWD", DEFAULT_FORWARD),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_latency > 0.0 && self.max_yaw_deg > 0.0 && self.max_jump > 0.0 && self.rejection_cap > 0
    }

    /// Apply onto a base configuration
    pub fn to_config(&self, base: &VisionGateConfig) -> Result<VisionGateConfig, ParameterError> {
        if !self.is_valid() {
            return Err(ParameterError::Inconsistent("vision"));
        }
        Ok(VisionGateConfig {
            max_latency: self.max_latency,
            max_ambiguity: self.max_ambiguity,
            max_yaw: self.max_yaw_deg.to_radians(),
            max_pose_jump: self.max_jump,
            rejection_cap: self.rejection_cap,
            forward_to_estimator: self.forward,
            ..*base
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let config = VisionParams::default()
            .to_config(&VisionGateConfig::default())
            .unwrap();
        let default = VisionGateConfig::default();
        assert!((config.max_yaw - default.max_yaw).abs() < 1e-6);
        assert_eq!(config.rejection_cap, default.rejection_cap);
        assert_eq!(config.forward_to_estimator, default.forward_to_estimator);
    }

    #[test]
    fn test_rejection_cap_tunable() {
        let mut store = ParameterStore::new();
        VisionParams::register_defaults(&mut store).unwrap();
        store.set("VIS_REJ_CAP", ParamValue::Int(5)).unwrap();
        store.set("VIS_FWD", ParamValue::Bool(false)).unwrap();
        let config = VisionParams::from_store(&store)
            .to_config(&VisionGateConfig::default())
            .unwrap();
        assert_eq!(config.rejection_cap, 5);
        assert!(!config.forward_to_estimator);
    }

    #[test]
    fn test_zero_cap_clamped() {
        let mut store = ParameterStore::new();
        VisionParams::register_defaults(&mut store).unwrap();
        store.set("VIS_REJ_CAP", ParamValue::Int(0)).unwrap();
        assert_eq!(VisionParams::from_store(&store).rejection_cap, 1);
    }
}
