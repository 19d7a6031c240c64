//! Permanent-magnet DC motor feed-forward
//!
//! Models a velocity-controlled wheel as `V = ks·sign(v) + kv·v + ka·a` and
//! solves the discretized plant for the voltage that moves the wheel from
//! its current velocity to the next velocity over one tick. Used for the
//! flywheels instead of PID so speed steps do not lag.

/// Static, velocity and acceleration gains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorFeedforward {
    /// Static friction voltage (V)
    pub ks: f32,
    /// Velocity gain (V·s/rad)
    pub kv: f32,
    /// Acceleration gain (V·s²/rad); zero disables the dynamic term
    pub ka: f32,
}

impl MotorFeedforward {
    pub const fn new(ks: f32, kv: f32, ka: f32) -> Self {
        Self { ks, kv, ka }
    }

    pub fn is_valid(&self) -> bool {
        self.ks.is_finite()
            && self.kv.is_finite()
            && self.ka.is_finite()
            && self.ks >= 0.0
            && self.kv > 0.0
            && self.ka >= 0.0
    }

    /// Steady-state voltage for a constant velocity.
    pub fn steady_state(&self, velocity: f32) -> f32 {
        self.ks * signum(velocity) + self.kv * velocity
    }

    /// Voltage that drives the wheel from `current` to `next` (rad/s)
    /// within `dt` seconds.
    ///
    /// With `A = -kv/ka`, `B = 1/ka`, the zero-order-hold discretization is
    /// `A_d = e^(A·dt)`, `B_d = (A_d - 1)/A · B`, and the required input is
    /// `(next - A_d·current) / B_d`.
    pub fn calculate(&self, current: f32, next: f32, dt: f32) -> f32 {
        if self.ka <= 0.0 || dt <= 0.0 {
            return self.steady_state(next);
        }
        let a = -self.kv / self.ka;
        let b = 1.0 / self.ka;
        let a_d = libm::expf(a * dt);
        let b_d = (a_d - 1.0) / a * b;
        self.ks * signum(current) + (next - a_d * current) / b_d
    }
}

fn signum(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
