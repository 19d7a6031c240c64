//! Lockstep simulation of the whole shooter
//!
//! Each `step()` integrates the plant for one tick under the voltages the
//! robot wrote last tick, moves the game piece, advances the clock and then
//! runs `Robot::periodic()`. Nothing depends on wall-clock time, so a run
//! with the same seed is reproducible.

use std::f32::consts::PI;

use fire_control::controllers::FireControl;
use fire_control::robot::{Robot, MAX_CAMERAS};
use fire_control::subsystems::{FlywheelPair, Intake, Tilt, Turret, VisionCorrector};
use fire_control_core::ballistics::{BallisticsConfig, BallisticsSolution};
use fire_control_core::geometry::{wrap_angle, Point3d, Pose2d};
use fire_control_core::input::ButtonLevels;
use fire_control_core::mechanism::{
    FlywheelConfig, IntakeConfig, TiltConfig, TurretConfig, TICK_PERIOD,
};
use fire_control_core::parameters::{
    FireControlParams, FlywheelParams, ParameterStore, TiltParams, TurretParams, VisionParams,
};
use fire_control_core::supervisor::{FireControlConfig, FireControlState};
use fire_control_core::targeting::{Alliance, FiducialLayout, TargetingConfig};
use fire_control_core::traits::TimeSource;
use fire_control_core::vision::VisionGateConfig;

use crate::camera::{CameraConfig, SimCamera};
use crate::chassis::{ChassisConfig, SimChassis};
use crate::clock::SimClock;
use crate::error::SimulationError;
use crate::hardware::{MotorModel, SimMotor, SimSensor, SimSwitch, SimValve};

/// Travel past the limit switches before the hard stop (rad)
const TURRET_OVERTRAVEL: f32 = 0.05;
/// Tilt hard stops (rad)
const TILT_TRAVEL: f32 = 1.3;

pub type SimRobot = Robot<
    Turret<SimMotor, SimSwitch>,
    Tilt<SimMotor>,
    FlywheelPair<SimMotor, SimSensor>,
    Intake<SimMotor, SimValve>,
    SimChassis,
    SimCamera,
    FiducialLayout,
>;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub tick_us: u64,
    pub start_pose: Pose2d,
    pub alliance: Alliance,
    /// Turret angle at power-on; the encoder reads zero there
    pub turret_start: f32,
    pub tilt_start: f32,
    /// Time with the intake deployed and the feed pulling in before a
    /// waiting piece reaches the loaded sensor (s)
    pub intake_time: f32,
    /// Feed time for a loaded piece to leave the shooter (s)
    pub clear_time: f32,
    pub turret: TurretConfig,
    pub tilt: TiltConfig,
    pub flywheel: FlywheelConfig,
    pub intake: IntakeConfig,
    pub fire_control: FireControlConfig,
    pub targeting: TargetingConfig,
    pub ballistics: BallisticsConfig,
    pub vision: VisionGateConfig,
    pub chassis: ChassisConfig,
    pub cameras: Vec<CameraConfig>,
    pub layout: FiducialLayout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_us: (TICK_PERIOD * 1_000_000.0) as u64,
            // In front of the red grid, facing it
            start_pose: Pose2d::new(13.0, 2.75, 0.0),
            alliance: Alliance::Red,
            turret_start: 0.3,
            tilt_start: 0.0,
            intake_time: 0.5,
            clear_time: 0.1,
            turret: TurretConfig::default(),
            tilt: TiltConfig::default(),
            flywheel: FlywheelConfig::default(),
            intake: IntakeConfig::default(),
            fire_control: FireControlConfig::default(),
            targeting: TargetingConfig::default(),
            ballistics: BallisticsConfig::default(),
            vision: VisionGateConfig::default(),
            chassis: ChassisConfig::default(),
            cameras: vec![CameraConfig::default()],
            layout: FiducialLayout::charged_up_2023(),
        }
    }
}

impl SimConfig {
    /// Apply operator overrides from a parameter store. A block whose
    /// values are inconsistent fails the whole call.
    pub fn apply_parameters(&mut self, store: &ParameterStore) -> Result<(), SimulationError> {
        self.turret = TurretParams::from_store(store).to_config(&self.turret)?;
        self.tilt = TiltParams::from_store(store).to_config(&self.tilt)?;
        self.flywheel = FlywheelParams::from_store(store).to_config(&self.flywheel)?;
        self.vision = VisionParams::from_store(store).to_config(&self.vision)?;
        self.fire_control = FireControlParams::from_store(store).to_config()?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let checks = [
            (self.tick_us > 0, "tick"),
            (self.intake_time > 0.0 && self.clear_time >= 0.0, "game piece"),
            (self.turret.is_valid(), "turret"),
            (self.tilt.is_valid(), "tilt"),
            (self.flywheel.is_valid(), "flywheel"),
            (self.intake.is_valid(), "intake"),
            (self.fire_control.is_valid(), "fire control"),
            (self.targeting.is_valid(), "targeting"),
            (self.ballistics.is_valid(), "ballistics"),
            (self.vision.is_valid(), "vision"),
            (self.chassis.is_valid(), "chassis"),
        ];
        for (ok, what) in checks {
            if !ok {
                return Err(SimulationError::InvalidConfig(what));
            }
        }
        if self.cameras.len() > MAX_CAMERAS {
            return Err(SimulationError::TooManyCameras(MAX_CAMERAS));
        }
        Ok(())
    }
}

/// What the shooter was doing when a piece left it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRecord {
    pub time_us: u64,
    pub robot_pose: Pose2d,
    /// True turret angle (rad)
    pub turret_angle: f32,
    /// True tilt angle (rad)
    pub tilt_angle: f32,
    /// Wheel speeds (rad/s)
    pub top_speed: f32,
    pub bottom_speed: f32,
    /// What fire control was aiming for
    pub solution: Option<BallisticsSolution>,
    pub target: Option<Point3d>,
}

impl ShotRecord {
    /// Angle between the shot's field azimuth and the target bearing (rad)
    pub fn aim_error(&self) -> Option<f32> {
        let target = self.target?;
        let solution = self.solution?;
        let pose = self.robot_pose;
        let bearing = (target.y - pose.y).atan2(target.x - pose.x);
        let mut azimuth = pose.heading + self.turret_angle;
        if solution.flipped {
            azimuth += PI;
        }
        Some(wrap_angle(azimuth - bearing).abs())
    }

    /// Worst wheel speed error against the solution (rad/s)
    pub fn speed_error(&self) -> Option<f32> {
        let solution = self.solution?;
        let top = (self.top_speed - solution.top_flywheel_speed).abs();
        let bottom = (self.bottom_speed - solution.bottom_flywheel_speed).abs();
        Some(top.max(bottom))
    }

    pub fn tilt_error(&self) -> Option<f32> {
        let solution = self.solution?;
        Some((self.tilt_angle - solution.tilt_angle).abs())
    }
}

pub struct Simulation {
    tick_us: u64,
    intake_time: f32,
    clear_time: f32,
    clock: SimClock,
    robot: SimRobot,
    chassis: SimChassis,
    turret_motor: SimMotor,
    forward_switch: SimSwitch,
    reverse_switch: SimSwitch,
    tilt_motor: SimMotor,
    top: SimMotor,
    bottom: SimMotor,
    feed: SimMotor,
    rollers: [SimMotor; 2],
    sensor: SimSensor,
    extend_valve: SimValve,
    piece_waiting: bool,
    piece_loaded: bool,
    intake_progress: f32,
    clear_progress: f32,
    shots: Vec<ShotRecord>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let clock = SimClock::new();
        let stop = config.turret.hard_limit + TURRET_OVERTRAVEL;
        let turret_motor = SimMotor::new(MotorModel::TURRET)
            .with_unknown_start(config.turret_start)
            .with_travel(-stop, stop);
        let forward_switch = SimSwitch::forward(turret_motor.clone(), config.turret.hard_limit);
        let reverse_switch = SimSwitch::reverse(turret_motor.clone(), config.turret.hard_limit);
        // Absolute encoder mounted half a turn out
        let tilt_motor = SimMotor::new(MotorModel::TILT)
            .with_absolute_encoder(config.tilt_start, PI)
            .with_travel(-TILT_TRAVEL, TILT_TRAVEL);
        let top = SimMotor::new(MotorModel::FLYWHEEL);
        let bottom = SimMotor::new(MotorModel::FLYWHEEL);
        let feed = SimMotor::new(MotorModel::ROLLER);
        let rollers = [
            SimMotor::new(MotorModel::ROLLER),
            SimMotor::new(MotorModel::ROLLER),
        ];
        let sensor = SimSensor::new();
        let extend_valve = SimValve::new();
        let chassis = SimChassis::new(config.start_pose, config.chassis);

        let mut fire_control = FireControl::new(
            config.fire_control,
            config.targeting.clone(),
            config.ballistics.clone(),
            config.layout.clone(),
        );
        fire_control.set_alliance(config.alliance);

        let mut robot = Robot::new(
            Turret::new(
                config.turret,
                turret_motor.clone(),
                forward_switch.clone(),
                reverse_switch.clone(),
            ),
            Tilt::new(config.tilt, tilt_motor.clone()),
            FlywheelPair::new(
                config.flywheel,
                top.clone(),
                bottom.clone(),
                feed.clone(),
                sensor.clone(),
            ),
            Intake::new(
                config.intake,
                rollers[0].clone(),
                rollers[1].clone(),
                extend_valve.clone(),
                SimValve::new(),
            ),
            chassis.clone(),
            fire_control,
        );

        for camera_config in &config.cameras {
            let camera = SimCamera::new(
                camera_config.clone(),
                chassis.clone(),
                turret_motor.clone(),
                clock.clone(),
                config.layout.clone(),
            )?;
            let corrector = VisionCorrector::new(camera, camera_config.mount, config.vision);
            robot
                .add_camera(corrector)
                .map_err(|_| SimulationError::TooManyCameras(MAX_CAMERAS))?;
        }

        Ok(Self {
            tick_us: config.tick_us,
            intake_time: config.intake_time,
            clear_time: config.clear_time,
            clock,
            robot,
            chassis,
            turret_motor,
            forward_switch,
            reverse_switch,
            tilt_motor,
            top,
            bottom,
            feed,
            rollers,
            sensor,
            extend_valve,
            piece_waiting: false,
            piece_loaded: false,
            intake_progress: 0.0,
            clear_progress: 0.0,
            shots: Vec::new(),
        })
    }

    /// Advance one enabled tick with the given operator buttons held.
    pub fn step(&mut self, levels: &ButtonLevels) {
        self.advance_physics();
        self.robot.periodic(levels, &self.clock);
    }

    /// Advance one tick with the robot disabled.
    pub fn step_disabled(&mut self) {
        self.advance_physics();
        self.robot.disabled();
    }

    /// Press buttons for one tick, then release them for one.
    pub fn tap(&mut self, levels: ButtonLevels) {
        self.step(&levels);
        self.step(&ButtonLevels::default());
    }

    /// Step until `done` holds. Returns the simulated time taken (s).
    pub fn run_until<F>(
        &mut self,
        what: &'static str,
        timeout_s: f32,
        levels: &ButtonLevels,
        mut done: F,
    ) -> Result<f32, SimulationError>
    where
        F: FnMut(&Simulation) -> bool,
    {
        let start = self.clock.now_us();
        let limit = (timeout_s * 1_000_000.0) as u64;
        loop {
            let elapsed = self.clock.now_us() - start;
            if done(self) {
                return Ok(elapsed as f32 / 1_000_000.0);
            }
            if elapsed >= limit {
                return Err(SimulationError::Timeout {
                    what,
                    after_s: timeout_s,
                });
            }
            self.step(levels);
        }
    }

    /// Keep tapping shoot until a shot leaves and fire control is back to
    /// tracking. Returns the simulated time taken (s).
    pub fn fire(&mut self, timeout_s: f32) -> Result<f32, SimulationError> {
        let start = self.clock.now_us();
        let limit = (timeout_s * 1_000_000.0) as u64;
        let shots = self.shots.len();
        let shoot = ButtonLevels {
            shoot: true,
            ..ButtonLevels::default()
        };
        loop {
            let elapsed = self.clock.now_us() - start;
            let state = self.state();
            if self.shots.len() > shots && state != FireControlState::Shooting {
                return Ok(elapsed as f32 / 1_000_000.0);
            }
            if elapsed >= limit {
                return Err(SimulationError::Timeout {
                    what: "shot",
                    after_s: timeout_s,
                });
            }
            if state == FireControlState::Tracking {
                self.tap(shoot);
            } else {
                self.step(&ButtonLevels::default());
            }
        }
    }

    /// Put a game piece where the intake can reach it.
    pub fn place_piece(&mut self) {
        self.piece_waiting = true;
    }

    pub fn robot(&self) -> &SimRobot {
        &self.robot
    }

    pub fn robot_mut(&mut self) -> &mut SimRobot {
        &mut self.robot
    }

    pub fn state(&self) -> FireControlState {
        self.robot.fire_control().state()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn time_s(&self) -> f32 {
        self.clock.now_us() as f32 / 1_000_000.0
    }

    pub fn chassis(&self) -> &SimChassis {
        &self.chassis
    }

    pub fn turret_motor(&self) -> &SimMotor {
        &self.turret_motor
    }

    pub fn forward_switch(&self) -> &SimSwitch {
        &self.forward_switch
    }

    pub fn reverse_switch(&self) -> &SimSwitch {
        &self.reverse_switch
    }

    pub fn tilt_motor(&self) -> &SimMotor {
        &self.tilt_motor
    }

    /// Flywheel speeds (top, bottom) in rad/s
    pub fn flywheel_speeds(&self) -> (f32, f32) {
        (self.top.speed(), self.bottom.speed())
    }

    pub fn piece_loaded(&self) -> bool {
        self.piece_loaded
    }

    pub fn intake_deployed(&self) -> bool {
        self.extend_valve.is_energized()
    }

    pub fn shots(&self) -> &[ShotRecord] {
        &self.shots
    }

    fn advance_physics(&mut self) {
        let dt = self.tick_us as f32 / 1_000_000.0;
        for motor in [
            &self.turret_motor,
            &self.tilt_motor,
            &self.top,
            &self.bottom,
            &self.feed,
        ]
        .into_iter()
        .chain(self.rollers.iter())
        {
            motor.step(dt);
        }
        self.chassis.step(dt);
        self.clock.advance(self.tick_us);
        self.move_piece(dt);
    }

    fn move_piece(&mut self, dt: f32) {
        if !self.piece_loaded {
            if self.piece_waiting && self.extend_valve.is_energized() && self.feed.voltage() < 0.0 {
                self.intake_progress += dt;
                if self.intake_progress >= self.intake_time {
                    log::info!("sim: piece reached the shooter");
                    self.piece_waiting = false;
                    self.piece_loaded = true;
                    self.intake_progress = 0.0;
                    self.sensor.set_present(true);
                }
            } else {
                self.intake_progress = 0.0;
            }
        } else if self.feed.voltage() > 0.0 {
            self.clear_progress += dt;
            if self.clear_progress >= self.clear_time {
                self.release_piece();
            }
        } else {
            self.clear_progress = 0.0;
        }
    }

    fn release_piece(&mut self) {
        self.piece_loaded = false;
        self.clear_progress = 0.0;
        self.sensor.set_present(false);

        let fire_control = self.robot.fire_control();
        let shot = ShotRecord {
            time_us: self.clock.now_us(),
            robot_pose: self.chassis.true_pose(),
            turret_angle: self.turret_motor.true_position(),
            tilt_angle: self.tilt_motor.true_position(),
            top_speed: self.top.speed(),
            bottom_speed: self.bottom.speed(),
            solution: fire_control.solution().copied(),
            target: fire_control.get_target_position(),
        };
        log::info!(
            "sim: shot {} at t={:.2}s, aim error {:?}",
            self.shots.len() + 1,
            self.time_s(),
            shot.aim_error()
        );
        self.shots.push(shot);
    }
}
