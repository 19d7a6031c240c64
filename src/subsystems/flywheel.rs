//! Top/bottom flywheel pair and feed roller
//!
//! Wheel voltages come from a feed-forward model stepping the measured
//! velocity to the target over one tick, not from feedback, so speed
//! changes do not lag. A zero or negative target coasts the wheel.

use fire_control_core::control::{sanitize_voltage, MotorFeedforward};
use fire_control_core::mechanism::{FeedState, FlywheelConfig};

use super::traits::FlywheelControl;
use crate::platform::{GpioError, InputPin, MotorInterface, PlatformError, Result};

/// Two independently driven flywheels sharing a loaded sensor.
pub struct FlywheelPair<M, S> {
    config: FlywheelConfig,
    top: M,
    bottom: M,
    feed: M,
    loaded_sensor: S,
    top_target: f32,
    bottom_target: f32,
    top_velocity: f32,
    bottom_velocity: f32,
    sensor_loaded: bool,
    has_cube: bool,
    feed_state: FeedState,
    /// Time spent in `FeedState::Shooting` (s)
    shooting_time: f32,
}

impl<M: MotorInterface, S: InputPin> FlywheelPair<M, S> {
    pub fn new(config: FlywheelConfig, top: M, bottom: M, feed: M, loaded_sensor: S) -> Self {
        Self {
            config,
            top,
            bottom,
            feed,
            loaded_sensor,
            top_target: 0.0,
            bottom_target: 0.0,
            top_velocity: 0.0,
            bottom_velocity: 0.0,
            sensor_loaded: false,
            has_cube: false,
            feed_state: FeedState::Idle,
            shooting_time: 0.0,
        }
    }

    pub fn config(&self) -> &FlywheelConfig {
        &self.config
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed_state
    }

    /// Target speeds (top, bottom)
    pub fn targets(&self) -> (f32, f32) {
        (self.top_target, self.bottom_target)
    }

    /// Velocities measured by the last `execute()` (top, bottom)
    pub fn velocities(&self) -> (f32, f32) {
        (self.top_velocity, self.bottom_velocity)
    }

    fn wheel_voltage(&self, model: &MotorFeedforward, current: f32, target: f32, dt: f32) -> f32 {
        if !(target > 0.0) {
            return 0.0;
        }
        sanitize_voltage(model.calculate(current, target, dt), self.config.max_voltage)
    }

    fn within_tolerance(&self, measured: f32, target: f32) -> bool {
        libm::fabsf(measured - target) < self.config.speed_tolerance
    }

    fn write(&mut self, top: f32, bottom: f32, feed: f32) -> Result<()> {
        // Attempt every motor even if one fails
        let top = self.top.set_voltage(top);
        let bottom = self.bottom.set_voltage(bottom);
        let feed = self.feed.set_voltage(feed);
        top.and(bottom).and(feed)
    }
}

impl<M: MotorInterface, S: InputPin> FlywheelControl for FlywheelPair<M, S> {
    fn set_speed(&mut self, top: f32, bottom: f32) {
        self.top_target = if top.is_finite() { top } else { 0.0 };
        self.bottom_target = if bottom.is_finite() { bottom } else { 0.0 };
    }

    fn stop(&mut self) {
        self.top_target = 0.0;
        self.bottom_target = 0.0;
        self.feed_state = FeedState::Idle;
    }

    fn load(&mut self) {
        self.feed_state = FeedState::Loading;
    }

    fn shoot(&mut self) {
        if self.feed_state != FeedState::Shooting {
            self.shooting_time = 0.0;
        }
        self.feed_state = FeedState::Shooting;
    }

    fn stop_feed(&mut self) {
        self.feed_state = FeedState::Idle;
    }

    fn is_ready(&self) -> bool {
        // A non-positive target is never ready, whatever the wheels read
        self.top_target > 0.0
            && self.bottom_target > 0.0
            && self.within_tolerance(self.top_velocity, self.top_target)
            && self.within_tolerance(self.bottom_velocity, self.bottom_target)
            && self.is_loaded()
    }

    fn is_loaded(&self) -> bool {
        self.sensor_loaded || self.has_cube
    }

    fn is_loading(&self) -> bool {
        self.feed_state == FeedState::Loading
    }

    fn is_shooting(&self) -> bool {
        self.feed_state == FeedState::Shooting
    }

    fn has_shot(&self) -> bool {
        self.feed_state == FeedState::Shooting
            && self.shooting_time >= self.config.shot_clearance
            && !self.sensor_loaded
    }

    fn set_has_cube(&mut self, has_cube: bool) {
        self.has_cube = has_cube;
    }

    fn execute(&mut self, dt: f32) -> Result<()> {
        let mut sensor_result = Ok(());
        match self.loaded_sensor.is_high() {
            Ok(high) => self.sensor_loaded = high != self.config.sensor_active_low,
            Err(_) => {
                // Keep the last reading; the manual latch covers a dead sensor
                sensor_result = Err(PlatformError::Gpio(GpioError::ReadFailed));
            }
        }

        let velocities = self
            .top
            .velocity()
            .and_then(|top| self.bottom.velocity().map(|bottom| (top, bottom)));
        match velocities {
            Ok((top, bottom)) => {
                self.top_velocity = top;
                self.bottom_velocity = bottom;
            }
            Err(e) => {
                let _ = self.write(0.0, 0.0, 0.0);
                return Err(e);
            }
        }

        if self.feed_state == FeedState::Shooting {
            self.shooting_time += dt;
        } else {
            self.shooting_time = 0.0;
        }

        let (top, bottom, feed) = match self.feed_state {
            FeedState::Loading => {
                let v = self.config.load_voltage;
                (v, v, v)
            }
            FeedState::Shooting | FeedState::Idle => {
                let top_model = self.config.top;
                let bottom_model = self.config.bottom;
                let top = self.wheel_voltage(&top_model, self.top_velocity, self.top_target, dt);
                let bottom =
                    self.wheel_voltage(&bottom_model, self.bottom_velocity, self.bottom_target, dt);
                let feed = if self.feed_state == FeedState::Shooting {
                    self.config.feed_voltage
                } else {
                    0.0
                };
                (top, bottom, feed)
            }
        };

        self.write(top, bottom, feed)?;
        sensor_result
    }
}
