//! Profiled angle servo
//!
//! The shared position-control core behind every aiming axis. A
//! `ProfiledServo` holds a goal angle that is always inside the axis soft
//! limits, advances a trapezoid-profile setpoint towards it each tick and
//! turns the setpoint into a voltage with PID plus velocity feed-forward.
//!
//! The servo never touches hardware: callers pass in the measured angle and
//! write the returned voltage themselves. That keeps it usable for both the
//! turret (which must also home) and the tilt (which must unwrap its
//! encoder) without inheritance.

use super::pid::{PidConfig, PidController};
use super::profile::{MotionConstraints, ProfileState, TrapezoidProfile};

/// Software travel bounds for one axis (radians).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftLimits {
    /// Most negative reachable angle
    pub reverse: f32,
    /// Most positive reachable angle
    pub forward: f32,
}

impl SoftLimits {
    pub const fn new(reverse: f32, forward: f32) -> Self {
        Self { reverse, forward }
    }

    /// Symmetric limits `[-limit, +limit]`.
    pub const fn symmetric(limit: f32) -> Self {
        Self {
            reverse: -limit,
            forward: limit,
        }
    }

    pub fn clamp(&self, angle: f32) -> f32 {
        angle.clamp(self.reverse, self.forward)
    }

    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.reverse && angle <= self.forward
    }

    pub fn is_valid(&self) -> bool {
        self.reverse.is_finite() && self.forward.is_finite() && self.reverse < self.forward
    }

    /// Both limits at one angle: an axis that cannot move.
    pub fn is_fixed(&self) -> bool {
        self.reverse == self.forward
    }
}

/// Goal angle that is clamped into the soft limits at write time.
///
/// A stored goal is always within limits. Non-finite requests are ignored
/// and the previous goal is kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleSetpoint {
    goal: f32,
}

impl AngleSetpoint {
    pub fn new(goal: f32, limits: &SoftLimits) -> Self {
        let mut setpoint = Self {
            goal: limits.clamp(0.0),
        };
        setpoint.set(goal, limits);
        setpoint
    }

    pub fn set(&mut self, goal: f32, limits: &SoftLimits) {
        if goal.is_finite() {
            self.goal = limits.clamp(goal);
        }
    }

    pub fn get(&self) -> f32 {
        self.goal
    }
}

/// Tuning for one profiled axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServoConfig {
    pub constraints: MotionConstraints,
    pub limits: SoftLimits,
    pub pid: PidConfig,
    /// Static friction feed-forward (V)
    pub ks: f32,
    /// Velocity feed-forward on the profile setpoint (V·s/rad)
    pub kv: f32,
    /// On-target tolerance (rad)
    pub tolerance: f32,
    /// Output voltage bound (V)
    pub max_voltage: f32,
}

impl ServoConfig {
    pub fn is_valid(&self) -> bool {
        self.constraints.is_valid()
            && self.limits.is_valid()
            && self.pid.is_valid()
            && self.ks >= 0.0
            && self.kv >= 0.0
            && self.tolerance > 0.0
            && self.max_voltage > 0.0
    }
}

/// Profile-constrained position controller.
#[derive(Clone, Debug)]
pub struct ProfiledServo {
    config: ServoConfig,
    profile: TrapezoidProfile,
    pid: PidController,
    goal: AngleSetpoint,
    setpoint: ProfileState,
}

impl ProfiledServo {
    pub fn new(config: ServoConfig) -> Self {
        Self {
            profile: TrapezoidProfile::new(config.constraints),
            pid: PidController::new(config.pid),
            goal: AngleSetpoint::new(0.0, &config.limits),
            setpoint: ProfileState::default(),
            config,
        }
    }

    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    pub fn limits(&self) -> &SoftLimits {
        &self.config.limits
    }

    /// Store a new goal, clamped into the soft limits.
    pub fn set_goal(&mut self, goal: f32) {
        self.goal.set(goal, &self.config.limits);
    }

    pub fn goal(&self) -> f32 {
        self.goal.get()
    }

    /// Current profile setpoint (intermediate target).
    pub fn setpoint(&self) -> ProfileState {
        self.setpoint
    }

    /// `|measured - goal| < tolerance`
    pub fn at_goal(&self, measured: f32) -> bool {
        libm::fabsf(measured - self.goal.get()) < self.config.tolerance
    }

    /// Restart the profile from a measured angle at rest.
    ///
    /// Called whenever the measurement jumps (homing rezero, encoder unwrap)
    /// so the profile does not chase a stale setpoint.
    pub fn reset(&mut self, measured: f32) {
        self.setpoint = ProfileState::new(measured, 0.0);
        self.pid.reset();
    }

    /// Advance the profile by `dt` and return the clamped voltage command.
    ///
    /// A non-finite result (bad measurement) yields 0 V.
    pub fn calculate(&mut self, measured: f32, dt: f32) -> f32 {
        let goal = ProfileState::new(self.goal.get(), 0.0);
        self.setpoint = self.profile.calculate(dt, self.setpoint, goal);

        let feedback = self.pid.calculate(measured, self.setpoint.position, dt);
        let velocity = self.setpoint.velocity;
        let feedforward = if velocity > 0.0 {
            self.config.ks + self.config.kv * velocity
        } else if velocity < 0.0 {
            -self.config.ks + self.config.kv * velocity
        } else {
            0.0
        };

        sanitize_voltage(feedback + feedforward, self.config.max_voltage)
    }
}

/// Clamp to `±max`, mapping NaN/inf to zero.
pub fn sanitize_voltage(voltage: f32, max: f32) -> f32 {
    if voltage.is_finite() {
        voltage.clamp(-max, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    const DT: f32 = 0.02;

    fn config() -> ServoConfig {
        ServoConfig {
            constraints: MotionConstraints::new(1.0, 0.5),
            limits: SoftLimits::symmetric(115.0 * PI / 180.0),
            pid: PidConfig::p(2.0),
            ks: 0.0,
            kv: 0.0,
            tolerance: PI / 180.0,
            max_voltage: 12.0,
        }
    }

    #[test]
    fn test_soft_limits() {
        let limits = SoftLimits::new(-1.0, 2.0);
        assert!(limits.is_valid());
        assert_eq!(limits.clamp(3.0), 2.0);
        assert_eq!(limits.clamp(-3.0), -1.0);
        assert!(limits.contains(0.0));
        assert!(!limits.contains(2.5));
        assert!(!SoftLimits::new(1.0, -1.0).is_valid());
    }

    #[test]
    fn test_setpoint_clamps_every_goal() {
        let limits = SoftLimits::symmetric(2.0);
        let mut sp = AngleSetpoint::new(0.0, &limits);
        for g in [-10.0_f32, -2.0, -1.5, 0.0, 1.99, 2.0, 7.5, f32::INFINITY] {
            sp.set(g, &limits);
            if g.is_finite() {
                assert_eq!(sp.get(), g.clamp(-2.0, 2.0));
            }
            assert!(limits.contains(sp.get()));
        }
    }

    #[test]
    fn test_setpoint_ignores_nan() {
        let limits = SoftLimits::symmetric(2.0);
        let mut sp = AngleSetpoint::new(1.0, &limits);
        sp.set(f32::NAN, &limits);
        assert_eq!(sp.get(), 1.0);
    }

    #[test]
    fn test_setpoint_default_clamped_into_asymmetric_limits() {
        let limits = SoftLimits::new(0.5, 1.5);
        let sp = AngleSetpoint::new(f32::NAN, &limits);
        assert_eq!(sp.get(), 0.5);
    }

    #[test]
    fn test_servo_drives_towards_goal() {
        let mut servo = ProfiledServo::new(config());
        servo.set_goal(1.0);
        let v = servo.calculate(0.0, DT);
        assert!(v > 0.0);

        servo.set_goal(-1.0);
        servo.reset(0.0);
        let v = servo.calculate(0.0, DT);
        assert!(v < 0.0);
    }

    #[test]
    fn test_servo_at_goal_tolerance() {
        let mut servo = ProfiledServo::new(config());
        servo.set_goal(0.5);
        assert!(servo.at_goal(0.5 + 0.5 * PI / 180.0));
        assert!(!servo.at_goal(0.5 + 2.0 * PI / 180.0));
    }

    #[test]
    fn test_servo_goal_clamped() {
        let mut servo = ProfiledServo::new(config());
        servo.set_goal(3.0);
        assert!((servo.goal() - 115.0 * PI / 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_servo_converges_on_ideal_plant() {
        let mut servo = ProfiledServo::new(config());
        servo.set_goal(0.8);
        let mut angle = 0.0;
        for _ in 0..500 {
            let v = servo.calculate(angle, DT);
            // Integrating plant: 1 V -> 0.5 rad/s
            angle += v * 0.5 * DT;
        }
        assert!(servo.at_goal(angle));
    }

    #[test]
    fn test_sanitize_voltage() {
        assert_eq!(sanitize_voltage(f32::NAN, 12.0), 0.0);
        assert_eq!(sanitize_voltage(20.0, 12.0), 12.0);
        assert_eq!(sanitize_voltage(-20.0, 12.0), -12.0);
        assert_eq!(sanitize_voltage(3.0, 12.0), 3.0);
    }
}
