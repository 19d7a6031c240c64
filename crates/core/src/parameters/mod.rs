//! Parameter management types and utilities
//!
//! Every tunable block registers its defaults into one [`ParameterStore`]
//! at boot, gets overridden by the operator, then is loaded back with
//! clamping and applied onto its mechanism config. A block whose loaded
//! values are mutually inconsistent is rejected as a whole and the
//! calibrated default stays in force.

pub mod error;
pub mod fire_control;
pub mod flywheel;
pub mod storage;
pub mod tilt;
pub mod turret;
pub mod vision;

pub use error::ParameterError;
pub use fire_control::FireControlParams;
pub use flywheel::FlywheelParams;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
pub use tilt::TiltParams;
pub use turret::TurretParams;
pub use vision::VisionParams;

/// Register the defaults of every block.
pub fn register_all(store: &mut ParameterStore) -> Result<(), ParameterError> {
    TurretParams::register_defaults(store)?;
    TiltParams::register_defaults(store)?;
    FlywheelParams::register_defaults(store)?;
    VisionParams::register_defaults(store)?;
    FireControlParams::register_defaults(store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_fits_store() {
        let mut store = ParameterStore::new();
        register_all(&mut store).unwrap();
        assert_eq!(store.len(), 8 + 8 + 7 + 6 + 2);
        assert!(store.len() <= MAX_PARAMS);
        // Nothing is hidden
        assert_eq!(store.count(), store.len());
    }

    #[test]
    fn test_register_all_idempotent() {
        let mut store = ParameterStore::new();
        register_all(&mut store).unwrap();
        store.set("TUR_KP", ParamValue::Float(3.0)).unwrap();
        register_all(&mut store).unwrap();
        assert_eq!(store.get("TUR_KP"), Some(&ParamValue::Float(3.0)));
    }
}
