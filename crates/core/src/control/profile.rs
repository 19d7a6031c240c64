//! Trapezoidal motion profile
//!
//! Generates a velocity- and acceleration-limited setpoint trajectory from
//! the current state towards a goal state. The profile is stateless: each
//! tick the caller passes the previous setpoint back in and advances it by
//! one period, so a goal change mid-motion simply re-plans from where the
//! setpoint currently is.

/// Velocity and acceleration bounds for one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConstraints {
    /// Maximum angular velocity (rad/s)
    pub max_velocity: f32,
    /// Maximum angular acceleration (rad/s²)
    pub max_acceleration: f32,
}

impl MotionConstraints {
    pub const fn new(max_velocity: f32, max_acceleration: f32) -> Self {
        Self {
            max_velocity,
            max_acceleration,
        }
    }

    /// Both bounds must be finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.max_velocity.is_finite()
            && self.max_acceleration.is_finite()
            && self.max_velocity > 0.0
            && self.max_acceleration > 0.0
    }
}

/// Position/velocity pair along a profile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProfileState {
    pub position: f32,
    pub velocity: f32,
}

impl ProfileState {
    pub const fn new(position: f32, velocity: f32) -> Self {
        Self { position, velocity }
    }

    fn directed(self, direction: f32) -> Self {
        Self {
            position: self.position * direction,
            velocity: self.velocity * direction,
        }
    }
}

/// Trapezoid profile bound to a set of constraints.
#[derive(Clone, Copy, Debug)]
pub struct TrapezoidProfile {
    constraints: MotionConstraints,
}

impl TrapezoidProfile {
    pub fn new(constraints: MotionConstraints) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> MotionConstraints {
        self.constraints
    }

    /// State reached `t` seconds after `current`, heading for `goal`.
    ///
    /// The profile accelerates at the limit, cruises at the velocity limit
    /// if the distance allows it, then decelerates to arrive at `goal`
    /// with the goal velocity. Past the end of the profile the goal is
    /// returned unchanged.
    pub fn calculate(&self, t: f32, current: ProfileState, goal: ProfileState) -> ProfileState {
        let max_v = self.constraints.max_velocity;
        let max_a = self.constraints.max_acceleration;

        // Work in a frame where motion is always towards +position
        let direction = if current.position > goal.position {
            -1.0
        } else {
            1.0
        };
        let mut current = current.directed(direction);
        let goal = goal.directed(direction);

        if current.velocity > max_v {
            current.velocity = max_v;
        }

        // Part of a full trapezoid already "behind" us at the start and end
        let cutoff_begin = current.velocity / max_a;
        let cutoff_dist_begin = cutoff_begin * cutoff_begin * max_a / 2.0;
        let cutoff_end = goal.velocity / max_a;
        let cutoff_dist_end = cutoff_end * cutoff_end * max_a / 2.0;

        let full_trapezoid_dist =
            cutoff_dist_begin + (goal.position - current.position) + cutoff_dist_end;
        let mut acceleration_time = max_v / max_a;
        let mut full_speed_dist = full_trapezoid_dist - acceleration_time * acceleration_time * max_a;

        // Triangle profile: never reaches cruise velocity
        if full_speed_dist < 0.0 {
            acceleration_time = libm::sqrtf((full_trapezoid_dist / max_a).max(0.0));
            full_speed_dist = 0.0;
        }

        let end_accel = acceleration_time - cutoff_begin;
        let end_full_speed = end_accel + full_speed_dist / max_v;
        let end_decel = end_full_speed + acceleration_time - cutoff_end;

        let mut result = current;
        if t < end_accel {
            result.velocity += t * max_a;
            result.position += (current.velocity + t * max_a / 2.0) * t;
        } else if t < end_full_speed {
            result.velocity = max_v;
            result.position += (current.velocity + end_accel * max_a / 2.0) * end_accel
                + max_v * (t - end_accel);
        } else if t <= end_decel {
            let time_left = end_decel - t;
            result.velocity = goal.velocity + time_left * max_a;
            result.position = goal.position - (goal.velocity + time_left * max_a / 2.0) * time_left;
        } else {
            result = goal;
        }

        result.directed(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn profile() -> TrapezoidProfile {
        TrapezoidProfile::new(MotionConstraints::new(1.0, 0.5))
    }

    #[test]
    fn test_constraints_validity() {
        assert!(MotionConstraints::new(1.0, 0.5).is_valid());
        assert!(!MotionConstraints::new(0.0, 0.5).is_valid());
        assert!(!MotionConstraints::new(1.0, f32::NAN).is_valid());
    }

    #[test]
    fn test_first_step_respects_acceleration() {
        let p = profile();
        let next = p.calculate(DT, ProfileState::default(), ProfileState::new(1.0, 0.0));
        assert!((next.velocity - 0.5 * DT).abs() < 1e-6);
        assert!(next.position > 0.0);
    }

    #[test]
    fn test_negative_direction() {
        let p = profile();
        let next = p.calculate(DT, ProfileState::default(), ProfileState::new(-1.0, 0.0));
        assert!(next.velocity < 0.0);
        assert!(next.position < 0.0);
    }

    #[test]
    fn test_converges_to_goal_without_overshoot() {
        let p = profile();
        let goal = ProfileState::new(1.2, 0.0);
        let mut state = ProfileState::default();
        let mut max_pos: f32 = 0.0;
        for _ in 0..1000 {
            state = p.calculate(DT, state, goal);
            max_pos = max_pos.max(state.position);
            assert!(state.velocity <= 1.0 + 1e-5);
        }
        assert!((state.position - 1.2).abs() < 1e-4);
        assert!(state.velocity.abs() < 1e-4);
        assert!(max_pos <= 1.2 + 1e-4);
    }

    #[test]
    fn test_cruise_velocity_reached_on_long_move() {
        let p = profile();
        let goal = ProfileState::new(10.0, 0.0);
        let mut state = ProfileState::default();
        // 2 s of acceleration to reach 1.0 rad/s
        for _ in 0..150 {
            state = p.calculate(DT, state, goal);
        }
        assert!((state.velocity - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_past_end_returns_goal() {
        let p = profile();
        let goal = ProfileState::new(0.1, 0.0);
        let state = p.calculate(100.0, ProfileState::default(), goal);
        assert_eq!(state, goal);
    }

    #[test]
    fn test_velocity_above_limit_is_capped() {
        let p = profile();
        let next = p.calculate(DT, ProfileState::new(0.0, 5.0), ProfileState::new(10.0, 0.0));
        assert!(next.velocity <= 1.0 + 1e-6);
    }
}
