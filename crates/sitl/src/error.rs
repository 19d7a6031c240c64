use fire_control_core::parameters::ParameterError;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Invalid {0} configuration")]
    InvalidConfig(&'static str),

    #[error("Parameter error: {0}")]
    Parameter(ParameterError),

    #[error("Too many cameras (max {0})")]
    TooManyCameras(usize),

    #[error("Timeout after {after_s:.2} s waiting for {what}")]
    Timeout { what: &'static str, after_s: f32 },
}

impl From<ParameterError> for SimulationError {
    fn from(e: ParameterError) -> Self {
        SimulationError::Parameter(e)
    }
}
