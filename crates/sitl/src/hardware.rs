//! Simulated actuators and sensors
//!
//! Every device is a cheap handle around shared state: the simulation keeps
//! one clone to step physics and inspect outputs, the robot owns another.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use fire_control::platform::{self, MotorError, MotorInterface};
use fire_control_core::geometry::wrap_angle;

/// Supply voltage; commands beyond it are clipped
pub const SUPPLY_VOLTAGE: f32 = 12.0;

/// First-order DC motor plant: `V = ks·sign(v) + kv·v + ka·a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorModel {
    /// Static friction (V)
    pub ks: f32,
    /// Back-EMF (V·s/rad)
    pub kv: f32,
    /// Inertia (V·s²/rad)
    pub ka: f32,
}

impl MotorModel {
    pub const fn new(ks: f32, kv: f32, ka: f32) -> Self {
        Self { ks, kv, ka }
    }

    /// Geared turret drive, about 1 rad/s per volt
    pub const TURRET: MotorModel = MotorModel::new(0.0, 1.0, 0.05);
    /// Tilt drive
    pub const TILT: MotorModel = MotorModel::new(0.1, 1.0, 0.05);
    /// Flywheel, matching the calibrated feed-forward
    pub const FLYWHEEL: MotorModel = MotorModel::new(0.2, 0.02, 0.005);
    /// Feed and intake rollers
    pub const ROLLER: MotorModel = MotorModel::new(0.1, 0.05, 0.01);

    /// Velocity after holding `voltage` for `dt`, using the exact
    /// zero-order-hold solution of the plant.
    pub fn step(&self, velocity: f32, voltage: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return velocity;
        }
        // Stiction holds a wheel at rest
        if velocity == 0.0 && voltage.abs() <= self.ks {
            return 0.0;
        }
        let friction = if velocity != 0.0 {
            velocity.signum()
        } else {
            voltage.signum()
        };
        let a = -self.kv / self.ka;
        let a_d = (a * dt).exp();
        let b_d = (a_d - 1.0) / a / self.ka;
        let next = a_d * velocity + b_d * (voltage - self.ks * friction);
        // Friction stops a coasting wheel, it never reverses it
        if velocity != 0.0 && next.signum() != velocity.signum() && voltage.abs() <= self.ks {
            0.0
        } else {
            next
        }
    }
}

#[derive(Debug)]
struct MotorState {
    model: MotorModel,
    voltage: f32,
    velocity: f32,
    /// Mechanism angle (rad), the ground truth
    position: f32,
    /// `position - reported`
    encoder_offset: f32,
    /// Reported angle wraps into (-π, π]
    absolute: bool,
    /// Hard stops
    travel: Option<(f32, f32)>,
    fail_writes: bool,
}

/// Simulated motor with an integrated encoder.
#[derive(Debug, Clone)]
pub struct SimMotor {
    state: Rc<RefCell<MotorState>>,
}

impl SimMotor {
    pub fn new(model: MotorModel) -> Self {
        Self {
            state: Rc::new(RefCell::new(MotorState {
                model,
                voltage: 0.0,
                velocity: 0.0,
                position: 0.0,
                encoder_offset: 0.0,
                absolute: false,
                travel: None,
                fail_writes: false,
            })),
        }
    }

    /// Start at `angle` with the encoder reading zero, like a relative
    /// encoder at power-on.
    pub fn with_unknown_start(self, angle: f32) -> Self {
        {
            let mut s = self.state.borrow_mut();
            s.position = angle;
            s.encoder_offset = angle;
        }
        self
    }

    /// Absolute encoder mounted `offset` radians from the mechanism zero.
    pub fn with_absolute_encoder(self, start: f32, offset: f32) -> Self {
        {
            let mut s = self.state.borrow_mut();
            s.absolute = true;
            s.position = start;
            s.encoder_offset = -offset;
        }
        self
    }

    /// Mechanism cannot move outside `[min, max]`.
    pub fn with_travel(self, min: f32, max: f32) -> Self {
        self.state.borrow_mut().travel = Some((min, max));
        self
    }

    /// Advance the plant by `dt` under the last commanded voltage.
    pub fn step(&self, dt: f32) {
        let mut s = self.state.borrow_mut();
        let velocity = s.model.step(s.velocity, s.voltage, dt);
        let mut position = s.position + velocity * dt;
        s.velocity = velocity;
        if let Some((min, max)) = s.travel {
            if position <= min || position >= max {
                position = position.clamp(min, max);
                s.velocity = 0.0;
            }
        }
        s.position = position;
    }

    pub fn voltage(&self) -> f32 {
        self.state.borrow().voltage
    }

    pub fn speed(&self) -> f32 {
        self.state.borrow().velocity
    }

    /// Mechanism angle regardless of what the encoder says
    pub fn true_position(&self) -> f32 {
        self.state.borrow().position
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl MotorInterface for SimMotor {
    fn set_voltage(&mut self, voltage: f32) -> platform::Result<()> {
        let mut s = self.state.borrow_mut();
        if s.fail_writes {
            s.voltage = 0.0;
            return Err(MotorError::WriteFailed.into());
        }
        s.voltage = if voltage.is_finite() {
            voltage.clamp(-SUPPLY_VOLTAGE, SUPPLY_VOLTAGE)
        } else {
            0.0
        };
        Ok(())
    }

    fn position(&mut self) -> platform::Result<f32> {
        let s = self.state.borrow();
        let reported = s.position - s.encoder_offset;
        Ok(if s.absolute {
            wrap_angle(reported)
        } else {
            reported
        })
    }

    fn velocity(&mut self) -> platform::Result<f32> {
        Ok(self.state.borrow().velocity)
    }

    fn set_position(&mut self, angle: f32) -> platform::Result<()> {
        let mut s = self.state.borrow_mut();
        if s.fail_writes {
            return Err(MotorError::WriteFailed.into());
        }
        s.encoder_offset = s.position - angle;
        Ok(())
    }
}

/// Active-low limit switch tripped by a motor's mechanism angle.
#[derive(Debug, Clone)]
pub struct SimSwitch {
    motor: SimMotor,
    trip_angle: f32,
    forward: bool,
    forced: Rc<Cell<Option<bool>>>,
}

impl SimSwitch {
    /// Closed at or beyond `angle`
    pub fn forward(motor: SimMotor, angle: f32) -> Self {
        Self {
            motor,
            trip_angle: angle,
            forward: true,
            forced: Rc::new(Cell::new(None)),
        }
    }

    /// Closed at or below `-angle`
    pub fn reverse(motor: SimMotor, angle: f32) -> Self {
        Self {
            motor,
            trip_angle: -angle,
            forward: false,
            forced: Rc::new(Cell::new(None)),
        }
    }

    /// Override the mechanism, e.g. a shorted switch. `None` restores it.
    pub fn force(&self, closed: Option<bool>) {
        self.forced.set(closed);
    }

    pub fn is_closed(&self) -> bool {
        if let Some(closed) = self.forced.get() {
            return closed;
        }
        let angle = self.motor.true_position();
        if self.forward {
            angle >= self.trip_angle
        } else {
            angle <= self.trip_angle
        }
    }
}

impl ErrorType for SimSwitch {
    type Error = Infallible;
}

impl InputPin for SimSwitch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_closed())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.is_closed())
    }
}

/// Active-low game-piece sensor.
#[derive(Debug, Clone, Default)]
pub struct SimSensor {
    present: Rc<Cell<bool>>,
}

impl SimSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_present(&self, present: bool) {
        self.present.set(present);
    }

    pub fn is_present(&self) -> bool {
        self.present.get()
    }
}

impl ErrorType for SimSensor {
    type Error = Infallible;
}

impl InputPin for SimSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.present.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.present.get())
    }
}

/// Solenoid valve output.
#[derive(Debug, Clone, Default)]
pub struct SimValve {
    energized: Rc<Cell<bool>>,
}

impl SimValve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_energized(&self) -> bool {
        self.energized.get()
    }
}

impl ErrorType for SimValve {
    type Error = Infallible;
}

impl OutputPin for SimValve {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.energized.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.energized.set(true);
        Ok(())
    }
}
