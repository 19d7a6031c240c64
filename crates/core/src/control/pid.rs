//! PID controller
//!
//! Position-form PID with a clamped integrator. The derivative term acts on
//! the error and is skipped on the first sample after a reset so a fresh
//! setpoint does not produce a derivative kick.

/// PID gains and integrator bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Absolute bound on the integral term contribution (volts)
    pub integral_limit: f32,
}

impl PidConfig {
    pub const fn p(kp: f32) -> Self {
        Self {
            kp,
            ki: 0.0,
            kd: 0.0,
            integral_limit: 0.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kp.is_finite()
            && self.ki.is_finite()
            && self.kd.is_finite()
            && self.kp >= 0.0
            && self.ki >= 0.0
            && self.kd >= 0.0
            && self.integral_limit >= 0.0
    }
}

#[derive(Clone, Debug)]
pub struct PidController {
    config: PidConfig,
    integral: f32,
    prev_error: Option<f32>,
}

impl PidController {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_error: None,
        }
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Clear integrator and derivative history.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = None;
    }

    /// Controller output for one sample period `dt` (seconds).
    pub fn calculate(&mut self, measurement: f32, setpoint: f32, dt: f32) -> f32 {
        let error = setpoint - measurement;
        if !error.is_finite() || dt <= 0.0 {
            return 0.0;
        }

        let p = self.config.kp * error;

        let mut i = 0.0;
        if self.config.ki > 0.0 {
            self.integral += error * dt;
            let limit = self.config.integral_limit / self.config.ki;
            self.integral = self.integral.clamp(-limit, limit);
            i = self.config.ki * self.integral;
        }

        let d = match self.prev_error {
            Some(prev) => self.config.kd * (error - prev) / dt,
            None => 0.0,
        };
        self.prev_error = Some(error);

        p + i + d
    }
}
