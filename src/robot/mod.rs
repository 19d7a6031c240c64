//! Per-tick orchestration
//!
//! `Robot` owns every subsystem and runs them in a fixed order each tick:
//!
//! 1. read the chassis pose estimate
//! 2. turn button levels into operator events and apply them
//! 3. FireControl updates setpoints
//! 4. each VisionCorrector fuses its latest frame (once the turret is
//!    indexed)
//! 5. turret, tilt, flywheels and intake `execute()`
//!
//! Actuators run last so the voltages they write reflect this tick's goals.
//! A failing subsystem is logged and skipped; the rest still run.

use bitflags::bitflags;
use heapless::Vec;

use fire_control_core::input::{ButtonLevels, OperatorEvents, OperatorInput};
use fire_control_core::mechanism::TICK_PERIOD;
use fire_control_core::targeting::FieldLayout;
use fire_control_core::traits::TimeSource;

use crate::controllers::{FireControl, Mechanisms};
use crate::platform::Result;
use crate::subsystems::{
    AngleAxis, Camera, Chassis, FlywheelControl, IntakeControl, TiltAxis, TurretAxis,
    VisionCorrector,
};

/// Maximum cameras a robot can carry
pub const MAX_CAMERAS: usize = 4;

/// Longest step handed to the servos after a late tick (s)
const MAX_DT: f32 = 5.0 * TICK_PERIOD;

bitflags! {
    /// Subsystems whose last `execute()` failed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Faults: u8 {
        const TURRET = 1 << 0;
        const TILT = 1 << 1;
        const FLYWHEELS = 1 << 2;
        const INTAKE = 1 << 3;
    }
}

pub struct Robot<T, Ti, F, I, Ch, C, L> {
    turret: T,
    tilt: Ti,
    flywheels: F,
    intake: I,
    chassis: Ch,
    cameras: Vec<VisionCorrector<C>, MAX_CAMERAS>,
    input: OperatorInput,
    fire_control: FireControl<L>,
    faults: Faults,
    last_tick_us: Option<u64>,
}

impl<T, Ti, F, I, Ch, C, L> Robot<T, Ti, F, I, Ch, C, L>
where
    T: TurretAxis,
    Ti: TiltAxis,
    F: FlywheelControl,
    I: IntakeControl,
    Ch: Chassis,
    C: Camera,
    L: FieldLayout,
{
    pub fn new(
        turret: T,
        tilt: Ti,
        flywheels: F,
        intake: I,
        chassis: Ch,
        fire_control: FireControl<L>,
    ) -> Self {
        Self {
            turret,
            tilt,
            flywheels,
            intake,
            chassis,
            cameras: Vec::new(),
            input: OperatorInput::new(),
            fire_control,
            faults: Faults::empty(),
            last_tick_us: None,
        }
    }

    /// Add a camera. Hands the corrector back if all slots are taken.
    pub fn add_camera(
        &mut self,
        corrector: VisionCorrector<C>,
    ) -> core::result::Result<(), VisionCorrector<C>> {
        self.cameras.push(corrector)
    }

    pub fn turret(&self) -> &T {
        &self.turret
    }

    pub fn tilt(&self) -> &Ti {
        &self.tilt
    }

    pub fn flywheels(&self) -> &F {
        &self.flywheels
    }

    pub fn intake(&self) -> &I {
        &self.intake
    }

    pub fn chassis(&self) -> &Ch {
        &self.chassis
    }

    pub fn chassis_mut(&mut self) -> &mut Ch {
        &mut self.chassis
    }

    pub fn cameras(&self) -> &[VisionCorrector<C>] {
        &self.cameras
    }

    pub fn fire_control(&self) -> &FireControl<L> {
        &self.fire_control
    }

    pub fn fire_control_mut(&mut self) -> &mut FireControl<L> {
        &mut self.fire_control
    }

    pub fn faults(&self) -> Faults {
        self.faults
    }

    /// Run one enabled tick.
    pub fn periodic<S: TimeSource + ?Sized>(&mut self, levels: &ButtonLevels, time: &S) {
        let now_us = time.now_us();
        let dt = self.tick_dt(now_us);

        let pose = self.chassis.pose();

        let events = self.input.update(levels);
        self.apply_events(events);

        let mut mechanisms = Mechanisms {
            turret: &mut self.turret,
            tilt: &mut self.tilt,
            flywheels: &mut self.flywheels,
            intake: &mut self.intake,
        };
        self.fire_control.execute(&mut mechanisms, &pose, now_us);

        // Turret-mounted cameras are only placed once the turret is indexed.
        // Measured on the previous tick, i.e. where the camera was.
        if self.turret.index_state().is_found() {
            let turret_angle = self.turret.angle();
            for camera in self.cameras.iter_mut() {
                camera.execute(
                    self.fire_control.layout(),
                    &mut self.chassis,
                    turret_angle,
                    now_us,
                );
            }
        }

        let result = self.turret.execute(dt);
        self.record(Faults::TURRET, "turret", result);
        let result = self.tilt.execute(dt);
        self.record(Faults::TILT, "tilt", result);
        let result = self.flywheels.execute(dt);
        self.record(Faults::FLYWHEELS, "flywheels", result);
        let result = self.intake.execute();
        self.record(Faults::INTAKE, "intake", result);
    }

    /// Run one disabled tick: zero every output and re-home the turret on
    /// the next enable.
    pub fn disabled(&mut self) {
        self.flywheels.stop();
        self.intake.retract();
        self.turret.rehome();
        self.input.reset();
        self.last_tick_us = None;

        let result = self.turret.stop();
        self.record(Faults::TURRET, "turret", result);
        let result = self.tilt.stop();
        self.record(Faults::TILT, "tilt", result);
        let result = self.flywheels.execute(TICK_PERIOD);
        self.record(Faults::FLYWHEELS, "flywheels", result);
        let result = self.intake.execute();
        self.record(Faults::INTAKE, "intake", result);
    }

    fn apply_events(&mut self, events: OperatorEvents) {
        let fc = &mut self.fire_control;
        if events.contains(OperatorEvents::HEIGHT_UP) {
            fc.select_up();
        }
        if events.contains(OperatorEvents::HEIGHT_DOWN) {
            fc.select_down();
        }
        if events.contains(OperatorEvents::COLUMN_LEFT) {
            fc.select_left();
        }
        if events.contains(OperatorEvents::COLUMN_RIGHT) {
            fc.select_right();
        }
        if events.contains(OperatorEvents::RECOVER) {
            fc.recover();
        }
        if events.contains(OperatorEvents::INTAKE) {
            fc.intake();
        }
        if events.contains(OperatorEvents::SHOOT) {
            fc.shoot();
        }
    }

    fn tick_dt(&mut self, now_us: u64) -> f32 {
        let dt = match self.last_tick_us {
            Some(last) if now_us > last => (now_us - last) as f32 / 1_000_000.0,
            _ => TICK_PERIOD,
        };
        self.last_tick_us = Some(now_us);
        dt.min(MAX_DT)
    }

    /// Log a subsystem failure once, and again when it clears.
    fn record(&mut self, fault: Faults, name: &'static str, result: Result<()>) {
        match result {
            Err(e) => {
                if !self.faults.contains(fault) {
                    log_error!("{}: {}", name, e.as_str());
                }
                self.faults.insert(fault);
            }
            Ok(()) => {
                if self.faults.contains(fault) {
                    log_info!("{}: recovered", name);
                }
                self.faults.remove(fault);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockInput, MockMotor, MockOutput};
    use crate::subsystems::mock::{MockCamera, MockChassis};
    use crate::subsystems::{FlywheelPair, Intake, Tilt, Turret};
    use fire_control_core::ballistics::{BallisticsConfig, GoalHeight};
    use fire_control_core::geometry::Pose2d;
    use fire_control_core::mechanism::{
        FlywheelConfig, IndexState, IntakeConfig, TiltConfig, TurretConfig,
    };
    use fire_control_core::supervisor::{FireControlConfig, FireControlState};
    use fire_control_core::targeting::{FiducialLayout, TargetingConfig};
    use fire_control_core::traits::MockTime;
    use fire_control_core::vision::{CameraMount, TargetDetection, VisionFrame, VisionGateConfig};

    type TestRobot = Robot<
        Turret<MockMotor, MockInput>,
        Tilt<MockMotor>,
        FlywheelPair<MockMotor, MockInput>,
        Intake<MockMotor, MockOutput>,
        MockChassis,
        MockCamera,
        FiducialLayout,
    >;

    struct Handles {
        turret_motor: MockMotor,
        forward_switch: MockInput,
        tilt_motor: MockMotor,
        top: MockMotor,
        feed: MockMotor,
        loaded: MockInput,
        front_roller: MockMotor,
        extend: MockOutput,
        chassis: MockChassis,
        camera: MockCamera,
    }

    fn robot(pose: Pose2d) -> (TestRobot, Handles) {
        let turret_motor = MockMotor::new();
        // Active-low switches and sensor, all released
        let forward_switch = MockInput::with_level(true);
        let reverse_switch = MockInput::with_level(true);
        let tilt_motor = MockMotor::new();
        let top = MockMotor::new();
        let bottom = MockMotor::new();
        let feed = MockMotor::new();
        let loaded = MockInput::with_level(true);
        let front_roller = MockMotor::new();
        let tunnel_roller = MockMotor::new();
        let extend = MockOutput::new();
        let retract = MockOutput::new();
        let chassis = MockChassis::new(pose);
        let camera = MockCamera::new("front");

        let fire_control = FireControl::new(
            FireControlConfig::default(),
            TargetingConfig::default(),
            BallisticsConfig::default(),
            FiducialLayout::charged_up_2023(),
        );
        let mut robot = Robot::new(
            Turret::new(
                TurretConfig::default(),
                turret_motor.clone(),
                forward_switch.clone(),
                reverse_switch,
            ),
            Tilt::new(TiltConfig::default(), tilt_motor.clone()),
            FlywheelPair::new(
                FlywheelConfig::default(),
                top.clone(),
                bottom,
                feed.clone(),
                loaded.clone(),
            ),
            Intake::new(
                IntakeConfig::default(),
                front_roller.clone(),
                tunnel_roller,
                extend.clone(),
                retract,
            ),
            chassis.clone(),
            fire_control,
        );
        let corrector =
            VisionCorrector::new(camera.clone(), CameraMount::default(), VisionGateConfig::default());
        assert!(robot.add_camera(corrector).is_ok());

        let handles = Handles {
            turret_motor,
            forward_switch,
            tilt_motor,
            top,
            feed,
            loaded,
            front_roller,
            extend,
            chassis,
            camera,
        };
        (robot, handles)
    }

    /// Close and release the forward switch so the turret indexes.
    fn index_turret(robot: &mut TestRobot, h: &Handles, time: &MockTime) {
        h.forward_switch.set_level(false);
        robot.periodic(&ButtonLevels::default(), time);
        time.advance(20_000);
        h.forward_switch.set_level(true);
    }

    #[test]
    fn test_first_ticks_seek_index() {
        let (mut robot, h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        robot.periodic(&ButtonLevels::default(), &time);
        assert_eq!(robot.turret().index_state(), IndexState::NotFound);
        assert!(h.turret_motor.voltage() > 0.0);
        assert_eq!(robot.fire_control().state(), FireControlState::PreparingIntake);
        // Tilt heads for the intake preset
        assert!(h.tilt_motor.voltage() < 0.0);
        assert!(robot.faults().is_empty());
    }

    #[test]
    fn test_index_found_through_switch() {
        let (mut robot, h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        index_turret(&mut robot, &h, &time);
        assert_eq!(robot.turret().index_state(), IndexState::Found);
        assert!((robot.turret().angle() - TurretConfig::default().hard_limit).abs() < 1e-6);
    }

    #[test]
    fn test_button_edges_apply_once() {
        let (mut robot, _h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        let held = ButtonLevels {
            height_down: true,
            ..ButtonLevels::default()
        };
        robot.periodic(&held, &time);
        time.advance(20_000);
        robot.periodic(&held, &time);
        assert_eq!(robot.fire_control().goal_height(), GoalHeight::Mid);

        time.advance(20_000);
        robot.periodic(&ButtonLevels::default(), &time);
        time.advance(20_000);
        robot.periodic(&held, &time);
        assert_eq!(robot.fire_control().goal_height(), GoalHeight::Low);
    }

    #[test]
    fn test_recover_button_stops_everything() {
        let (mut robot, h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        let recover = ButtonLevels {
            recover: true,
            ..ButtonLevels::default()
        };
        robot.periodic(&recover, &time);
        assert_eq!(robot.fire_control().state(), FireControlState::Recovery);
        assert_eq!(h.top.voltage(), 0.0);
        assert_eq!(h.feed.voltage(), 0.0);
        assert!(!h.extend.is_set_high());
    }

    #[test]
    fn test_intake_runs_once_axes_arrive() {
        let (mut robot, h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        index_turret(&mut robot, &h, &time);

        // Teleport both axes onto their intake goals
        h.turret_motor.set_angle(robot.turret().angle_goal());
        h.tilt_motor.set_angle(robot.tilt().angle_goal());
        for _ in 0..3 {
            robot.periodic(&ButtonLevels::default(), &time);
            time.advance(20_000);
        }
        assert_eq!(robot.fire_control().state(), FireControlState::Intaking);
        assert!(h.extend.is_set_high());
        assert!(h.front_roller.voltage() > 0.0);
        assert!(h.feed.voltage() < 0.0);

        // Piece arrives
        h.loaded.set_level(false);
        robot.periodic(&ButtonLevels::default(), &time);
        time.advance(20_000);
        robot.periodic(&ButtonLevels::default(), &time);
        assert_eq!(robot.fire_control().state(), FireControlState::Tracking);
        assert!(!h.extend.is_set_high());
        assert_eq!(h.front_roller.voltage(), 0.0);

        // Spinning up for the shot
        time.advance(20_000);
        robot.periodic(&ButtonLevels::default(), &time);
        assert!(h.top.voltage() > 0.0);
        assert_eq!(h.feed.voltage(), 0.0);
    }

    #[test]
    fn test_failing_subsystem_does_not_block_others() {
        let (mut robot, h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        h.turret_motor.fail_writes(true);
        robot.periodic(&ButtonLevels::default(), &time);
        assert!(robot.faults().contains(Faults::TURRET));
        assert!(!robot.faults().contains(Faults::TILT));
        assert!(h.tilt_motor.voltage() < 0.0);

        h.turret_motor.fail_writes(false);
        time.advance(20_000);
        robot.periodic(&ButtonLevels::default(), &time);
        assert!(robot.faults().is_empty());
    }

    #[test]
    fn test_disabled_zeroes_outputs_and_rehomes() {
        let (mut robot, h) = robot(Pose2d::new(13.0, 2.75, 0.0));
        let time = MockTime::new();
        index_turret(&mut robot, &h, &time);
        robot.periodic(&ButtonLevels::default(), &time);
        assert_eq!(robot.turret().index_state(), IndexState::Found);

        robot.disabled();
        assert_eq!(robot.turret().index_state(), IndexState::NotFound);
        assert_eq!(h.turret_motor.voltage(), 0.0);
        assert_eq!(h.tilt_motor.voltage(), 0.0);
        assert_eq!(h.top.voltage(), 0.0);
        assert_eq!(h.front_roller.voltage(), 0.0);
        assert!(!h.extend.is_set_high());

        // Seeks again once enabled
        time.advance(20_000);
        robot.periodic(&ButtonLevels::default(), &time);
        assert!(h.turret_motor.voltage() > 0.0);
    }

    #[test]
    fn test_vision_corrects_chassis() {
        let pose = Pose2d::new(13.0, 1.2, 0.0);
        let (mut robot, h) = robot(pose);
        let time = MockTime::with_initial(1_000_000);

        // Nothing fused before the turret is indexed
        h.camera.publish(detection_frame(pose, 0.0, 990_000));
        robot.periodic(&ButtonLevels::default(), &time);
        assert!(h.chassis.measurements().is_empty());

        time.advance(20_000);
        index_turret(&mut robot, &h, &time);
        let turret = robot.turret().angle();
        h.camera.publish(detection_frame(pose, turret, time.now_us() - 10_000));
        robot.periodic(&ButtonLevels::default(), &time);
        let measurements = h.chassis.measurements();
        assert_eq!(measurements.len(), 1);
        assert!((measurements[0].pose.x - 13.0).abs() < 1e-3);
        assert_eq!(robot.cameras().len(), 1);
        assert_eq!(robot.cameras()[0].rejections(), 0);

        // Same frame is not fused twice
        time.advance(20_000);
        robot.periodic(&ButtonLevels::default(), &time);
        assert_eq!(h.chassis.measurements().len(), 1);
    }

    fn detection_frame(pose: Pose2d, turret: f32, timestamp_us: u64) -> VisionFrame {
        let layout = FiducialLayout::charged_up_2023();
        let tag = layout.fiducial_pose(1).unwrap();
        let camera = pose.to_pose3d() * CameraMount::default().robot_to_camera(turret);
        let mut frame = VisionFrame::empty(timestamp_us);
        frame
            .targets
            .push(TargetDetection {
                fiducial_id: 1,
                camera_to_target: camera.inverse() * tag,
                ambiguity: 0.05,
                yaw: 0.0,
                area: 1.0,
            })
            .unwrap();
        frame
    }
}
