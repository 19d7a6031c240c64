//! Fire-Control Parameter Definitions
//!
//! # Parameters
//!
//! - `FC_SHOT_TIME` - Feed duration once a shot starts (s)
//! - `FC_INTAKE_AZ` - Turret azimuth while preparing to intake (degrees)

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};
use crate::supervisor::FireControlConfig;

const DEFAULT_SHOT_TIME: f32 = 0.5;
const DEFAULT_INTAKE_AZ_DEG: f32 = 0.0;

/// Fire-control parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct FireControlParams {
    pub shot_time: f32,
    pub intake_azimuth_deg: f32,
}

impl Default for FireControlParams {
    fn default() -> Self {
        Self {
            shot_time: DEFAULT_SHOT_TIME,
            intake_azimuth_deg: DEFAULT_INTAKE_AZ_DEG,
        }
    }
}

impl FireControlParams {
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "FC_SHOT_TIME",
            ParamValue::Float(DEFAULT_SHOT_TIME),
            ParamFlags::empty(),
        )?;
        store.register(
            "FC_INTAKE_AZ",
            ParamValue::Float(DEFAULT_INTAKE_AZ_DEG),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            shot_time: load_float(store, "FC_SHOT_TIME", DEFAULT_SHOT_TIME, 0.1, 3.0),
            intake_azimuth_deg: load_float(
                store,
                "FC_INTAKE_AZ",
                DEFAULT_INTAKE_AZ_DEG,
                -90.0,
                90.0,
            ),
        }
    }

    pub fn to_config(&self) -> Result<FireControlConfig, ParameterError> {
        let config = FireControlConfig {
            shot_duration: self.shot_time,
            intake_turret_angle: self.intake_azimuth_deg.to_radians(),
        };
        if !config.is_valid() {
            return Err(ParameterError::Inconsistent("fire_control"));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        assert_eq!(
            FireControlParams::default().to_config().unwrap(),
            FireControlConfig::default()
        );
    }

    #[test]
    fn test_shot_time_clamped() {
        let mut store = ParameterStore::new();
        FireControlParams::register_defaults(&mut store).unwrap();
        store.set("FC_SHOT_TIME", ParamValue::Float(0.0)).unwrap();
        let params = FireControlParams::from_store(&store);
        assert!((params.shot_time - 0.1).abs() < 1e-6);
    }
}
