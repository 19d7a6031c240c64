//! Fire-control state machine
//!
//! Sequences the shooter through acquiring a game piece, tracking the
//! selected scoring node and firing.
//!
//! ```text
//!                 ┌──────────────── intake() ───────────────┐
//!                 v                                         │
//! PreparingIntake ──(axes at intake pose)──> Intaking       │
//!                                               │           │
//!                                          (loaded)         │
//!                                               v           │
//!            Shooting <──(shoot() + ready)── Tracking ──────┤ (not loaded)
//!               │                               ^           │
//!               └────────(shot duration)────────┘        Recovery
//!                                                           ^
//!                          recover() from any state except Shooting
//! ```
//!
//! Operator requests are latched by the public methods and consumed by the
//! next `execute()`. Every request lives for exactly one tick: holding the
//! trigger does not re-fire once the shot completes.

use fire_control_core::ballistics::{
    BallisticsConfig, BallisticsSolution, BallisticsSolver, GoalHeight, GridColumn,
};
use fire_control_core::geometry::{Point3d, Pose2d};
use fire_control_core::supervisor::{FireControlConfig, FireControlState};
use fire_control_core::targeting::{
    Alliance, FieldLayout, Target, TargetError, TargetSelector, TargetingConfig,
};

use crate::subsystems::{AngleAxis, FlywheelControl, IntakeControl, TiltAxis, TurretAxis};

/// Subsystems FireControl commands for one tick. Borrowed, never owned.
pub struct Mechanisms<'a> {
    pub turret: &'a mut dyn TurretAxis,
    pub tilt: &'a mut dyn TiltAxis,
    pub flywheels: &'a mut dyn FlywheelControl,
    pub intake: &'a mut dyn IntakeControl,
}

pub struct FireControl<L> {
    config: FireControlConfig,
    selector: TargetSelector,
    solver: BallisticsSolver,
    layout: L,
    state: FireControlState,
    alliance: Alliance,
    goal: GoalHeight,
    column: GridColumn,
    try_shoot: bool,
    intake_requested: bool,
    recover_requested: bool,
    /// Last good solution; kept when no target is available
    solution: Option<BallisticsSolution>,
    target: Option<Target>,
    target_lost: bool,
    shot_started_us: u64,
    /// Whether the last completed shot saw the piece leave
    last_shot_cleared: Option<bool>,
}

impl<L: FieldLayout> FireControl<L> {
    pub fn new(
        config: FireControlConfig,
        targeting: TargetingConfig,
        ballistics: BallisticsConfig,
        layout: L,
    ) -> Self {
        Self {
            config,
            selector: TargetSelector::new(targeting),
            solver: BallisticsSolver::new(ballistics),
            layout,
            state: FireControlState::PreparingIntake,
            alliance: Alliance::default(),
            goal: GoalHeight::default(),
            column: GridColumn::default(),
            try_shoot: false,
            intake_requested: false,
            recover_requested: false,
            solution: None,
            target: None,
            target_lost: false,
            shot_started_us: 0,
            last_shot_cleared: None,
        }
    }

    pub fn state(&self) -> FireControlState {
        self.state
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn alliance(&self) -> Alliance {
        self.alliance
    }

    pub fn set_alliance(&mut self, alliance: Alliance) {
        self.alliance = alliance;
    }

    pub fn goal_height(&self) -> GoalHeight {
        self.goal
    }

    pub fn column(&self) -> GridColumn {
        self.column
    }

    /// Most recent firing solution
    pub fn solution(&self) -> Option<&BallisticsSolution> {
        self.solution.as_ref()
    }

    /// `Some(false)` if the last shot finished without the piece leaving.
    /// `None` before the first shot.
    pub fn last_shot_cleared(&self) -> Option<bool> {
        self.last_shot_cleared
    }

    /// Aim point of the most recent solution, for display
    pub fn get_target_position(&self) -> Option<Point3d> {
        self.target.map(|target| target.position)
    }

    /// Fire on this tick if everything is ready
    pub fn shoot(&mut self) {
        self.try_shoot = true;
    }

    /// Go and pick up a game piece
    pub fn intake(&mut self) {
        self.intake_requested = true;
    }

    /// Stop everything, e.g. to clear a jam
    pub fn recover(&mut self) {
        self.recover_requested = true;
    }

    pub fn select_up(&mut self) {
        self.goal = self.goal.up();
    }

    pub fn select_down(&mut self) {
        self.goal = self.goal.down();
    }

    pub fn select_left(&mut self) {
        self.column = self.column.left();
    }

    pub fn select_right(&mut self) {
        self.column = self.column.right();
    }

    /// Advance one tick. Only records setpoints; subsystems run their own
    /// `execute()` afterwards.
    pub fn execute(&mut self, mech: &mut Mechanisms<'_>, pose: &Pose2d, now_us: u64) {
        self.handle_requests(mech);

        let next = match self.state {
            FireControlState::PreparingIntake => self.preparing_intake(mech),
            FireControlState::Intaking => self.intaking(mech),
            FireControlState::Tracking => self.tracking(mech, pose, now_us),
            FireControlState::Shooting => self.shooting(mech, pose, now_us),
            FireControlState::Recovery => self.recovering(mech),
        };
        self.transition(next);

        // One-tick request
        self.try_shoot = false;
    }

    fn handle_requests(&mut self, mech: &mut Mechanisms<'_>) {
        let intake = core::mem::take(&mut self.intake_requested);
        let recover = core::mem::take(&mut self.recover_requested);
        if self.state.must_finish() {
            return;
        }
        if recover {
            self.transition(FireControlState::Recovery);
        } else if intake {
            let allowed = match self.state {
                FireControlState::Recovery => true,
                FireControlState::Tracking => !mech.flywheels.is_loaded(),
                _ => false,
            };
            if allowed {
                self.transition(FireControlState::PreparingIntake);
            }
        }
    }

    fn transition(&mut self, next: FireControlState) {
        if next != self.state {
            log_info!(
                "fire control: {} -> {}",
                self.state.as_str(),
                next.as_str()
            );
            self.state = next;
        }
    }

    fn hold_intake_pose(&self, mech: &mut Mechanisms<'_>) {
        mech.turret.set_angle(self.config.intake_turret_angle);
        mech.tilt.set_intake();
    }

    fn preparing_intake(&mut self, mech: &mut Mechanisms<'_>) -> FireControlState {
        self.hold_intake_pose(mech);
        mech.flywheels.stop();
        mech.intake.retract();
        if mech.turret.at_angle() && mech.tilt.at_angle() {
            FireControlState::Intaking
        } else {
            FireControlState::PreparingIntake
        }
    }

    fn intaking(&mut self, mech: &mut Mechanisms<'_>) -> FireControlState {
        self.hold_intake_pose(mech);
        if mech.flywheels.is_loaded() {
            mech.intake.retract();
            mech.flywheels.stop_feed();
            return FireControlState::Tracking;
        }
        mech.intake.deploy();
        mech.flywheels.load();
        FireControlState::Intaking
    }

    fn tracking(
        &mut self,
        mech: &mut Mechanisms<'_>,
        pose: &Pose2d,
        now_us: u64,
    ) -> FireControlState {
        mech.intake.retract();
        self.aim(mech, pose);
        mech.flywheels.stop_feed();
        if mech.flywheels.is_loaded() {
            self.spin_up(mech);
        } else {
            mech.flywheels.stop();
        }

        if self.try_shoot
            && mech.flywheels.is_ready()
            && mech.turret.at_angle()
            && mech.tilt.at_angle()
        {
            self.shot_started_us = now_us;
            mech.flywheels.shoot();
            return FireControlState::Shooting;
        }
        FireControlState::Tracking
    }

    fn shooting(
        &mut self,
        mech: &mut Mechanisms<'_>,
        pose: &Pose2d,
        now_us: u64,
    ) -> FireControlState {
        self.aim(mech, pose);
        self.spin_up(mech);

        let elapsed = now_us.saturating_sub(self.shot_started_us);
        if elapsed >= self.config.shot_duration_us() {
            let cleared = mech.flywheels.has_shot();
            if !cleared {
                log_warn!("fire control: shot ended with the piece still loaded");
            }
            self.last_shot_cleared = Some(cleared);
            mech.flywheels.stop_feed();
            mech.flywheels.set_has_cube(false);
            return FireControlState::Tracking;
        }
        mech.flywheels.shoot();
        FireControlState::Shooting
    }

    fn recovering(&mut self, mech: &mut Mechanisms<'_>) -> FireControlState {
        mech.flywheels.stop();
        mech.intake.retract();
        // Hold where they are
        let turret = mech.turret.angle();
        let tilt = mech.tilt.angle();
        mech.turret.set_angle(turret);
        mech.tilt.set_angle(tilt);
        FireControlState::Recovery
    }

    /// Refresh the solution and point the axes. Keeps the previous solution
    /// when no target can be selected.
    fn aim(&mut self, mech: &mut Mechanisms<'_>, pose: &Pose2d) {
        match self
            .selector
            .select(&self.layout, self.alliance, pose, self.goal, self.column)
        {
            Ok(target) => {
                let limits = mech.turret.limits();
                let was_flipped = self.solution.is_some_and(|s| s.flipped);
                let solution = self.solver.solve(
                    pose,
                    &target.position,
                    self.goal,
                    &limits,
                    was_flipped,
                );
                self.target = Some(target);
                self.solution = Some(solution);
                self.target_lost = false;
            }
            Err(error) => {
                if !self.target_lost {
                    match error {
                        TargetError::MissingFiducialPose(id) => {
                            log_warn!("fire control: no pose for fiducial {}, holding aim", id);
                        }
                        TargetError::NoFiducials => {
                            log_warn!(
                                "fire control: no {} fiducials, holding aim",
                                self.alliance.as_str()
                            );
                        }
                    }
                }
                self.target_lost = true;
            }
        }

        if let Some(solution) = self.solution {
            mech.turret.set_angle(solution.turret_angle);
            mech.tilt.set_angle(solution.tilt_angle);
        }
    }

    fn spin_up(&self, mech: &mut Mechanisms<'_>) {
        match self.solution {
            Some(s) => mech
                .flywheels
                .set_speed(s.top_flywheel_speed, s.bottom_flywheel_speed),
            None => mech.flywheels.set_speed(0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use fire_control_core::control::SoftLimits;
    use fire_control_core::geometry::Pose3d;
    use fire_control_core::mechanism::{FeedState, IndexState, TiltConfig, TurretConfig};
    use fire_control_core::targeting::FiducialLayout;
    use crate::platform::Result;
    use crate::subsystems::FixedMount;

    const SHOT_US: u64 = 500_000;
    const TICK_US: u64 = 20_000;

    struct FakeAxis {
        limits: SoftLimits,
        goal: f32,
        angle: f32,
        intake_angle: f32,
    }

    impl FakeAxis {
        fn new(limits: SoftLimits, intake_angle: f32) -> Self {
            Self {
                limits,
                goal: 0.0,
                angle: 0.0,
                intake_angle,
            }
        }

        fn settle(&mut self) {
            self.angle = self.goal;
        }
    }

    impl AngleAxis for FakeAxis {
        fn set_angle(&mut self, goal: f32) {
            self.goal = self.limits.clamp(goal);
        }
        fn angle(&self) -> f32 {
            self.angle
        }
        fn angle_goal(&self) -> f32 {
            self.goal
        }
        fn at_angle(&self) -> bool {
            (self.angle - self.goal).abs() < 1e-3
        }
        fn limits(&self) -> SoftLimits {
            self.limits
        }
        fn execute(&mut self, _dt: f32) -> Result<()> {
            Ok(())
        }
    }

    impl TurretAxis for FakeAxis {
        fn index_state(&self) -> IndexState {
            IndexState::Found
        }
    }

    impl TiltAxis for FakeAxis {
        fn set_intake(&mut self) {
            self.goal = self.intake_angle;
        }
    }

    #[derive(Default)]
    struct FakeFlywheels {
        targets: (f32, f32),
        feed: FeedState,
        sensor: bool,
        has_cube: bool,
        at_speed: bool,
        cleared: bool,
    }

    impl FlywheelControl for FakeFlywheels {
        fn set_speed(&mut self, top: f32, bottom: f32) {
            self.targets = (top, bottom);
        }
        fn stop(&mut self) {
            self.targets = (0.0, 0.0);
            self.feed = FeedState::Idle;
        }
        fn load(&mut self) {
            self.feed = FeedState::Loading;
        }
        fn shoot(&mut self) {
            self.feed = FeedState::Shooting;
        }
        fn stop_feed(&mut self) {
            self.feed = FeedState::Idle;
        }
        fn is_ready(&self) -> bool {
            self.targets.0 > 0.0 && self.targets.1 > 0.0 && self.at_speed && self.is_loaded()
        }
        fn is_loaded(&self) -> bool {
            self.sensor || self.has_cube
        }
        fn is_loading(&self) -> bool {
            self.feed == FeedState::Loading
        }
        fn is_shooting(&self) -> bool {
            self.feed == FeedState::Shooting
        }
        fn has_shot(&self) -> bool {
            self.feed == FeedState::Shooting && self.cleared
        }
        fn set_has_cube(&mut self, has_cube: bool) {
            self.has_cube = has_cube;
        }
        fn execute(&mut self, _dt: f32) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeIntake {
        deployed: bool,
    }

    impl IntakeControl for FakeIntake {
        fn deploy(&mut self) {
            self.deployed = true;
        }
        fn retract(&mut self) {
            self.deployed = false;
        }
        fn is_deployed(&self) -> bool {
            self.deployed
        }
        fn execute(&mut self) -> Result<()> {
            Ok(())
        }
    }

    /// Built-in layout with a switch to hide every fiducial.
    struct TestLayout {
        inner: FiducialLayout,
        blind: Cell<bool>,
    }

    impl FieldLayout for TestLayout {
        fn fiducial_pose(&self, id: u8) -> Option<Pose3d> {
            if self.blind.get() {
                None
            } else {
                self.inner.fiducial_pose(id)
            }
        }
    }

    struct Rig {
        fc: FireControl<TestLayout>,
        turret: FakeAxis,
        tilt: FakeAxis,
        flywheels: FakeFlywheels,
        intake: FakeIntake,
        now_us: u64,
        pose: Pose2d,
    }

    impl Rig {
        fn new() -> Self {
            let layout = TestLayout {
                inner: FiducialLayout::charged_up_2023(),
                blind: Cell::new(false),
            };
            let tilt_config = TiltConfig::default();
            Self {
                fc: FireControl::new(
                    FireControlConfig::default(),
                    TargetingConfig::default(),
                    BallisticsConfig::default(),
                    layout,
                ),
                turret: FakeAxis::new(TurretConfig::default().servo.limits, 0.0),
                tilt: FakeAxis::new(tilt_config.servo.limits, tilt_config.intake_angle),
                flywheels: FakeFlywheels::default(),
                intake: FakeIntake::default(),
                now_us: 0,
                // Facing the red grid from 2.5 m out
                pose: Pose2d::new(13.0, 2.75, 0.0),
            }
        }

        fn tick(&mut self) {
            let mut mech = Mechanisms {
                turret: &mut self.turret,
                tilt: &mut self.tilt,
                flywheels: &mut self.flywheels,
                intake: &mut self.intake,
            };
            let pose = self.pose;
            self.fc.execute(&mut mech, &pose, self.now_us);
            self.now_us += TICK_US;
        }

        fn settle(&mut self) {
            self.turret.settle();
            self.tilt.settle();
        }

        /// Run through intake into Tracking with a piece loaded.
        fn tracking() -> Self {
            let mut rig = Self::new();
            rig.tick();
            rig.settle();
            rig.tick();
            assert_eq!(rig.fc.state(), FireControlState::Intaking);
            rig.flywheels.sensor = true;
            rig.tick();
            assert_eq!(rig.fc.state(), FireControlState::Tracking);
            rig.tick();
            rig.settle();
            rig
        }
    }

    #[test]
    fn test_starts_preparing_intake() {
        let mut rig = Rig::new();
        assert_eq!(rig.fc.state(), FireControlState::PreparingIntake);
        rig.tick();
        assert_eq!(rig.turret.goal, 0.0);
        assert!((rig.tilt.goal - TiltConfig::default().intake_angle).abs() < 1e-6);
        // Axes not there yet
        assert_eq!(rig.fc.state(), FireControlState::PreparingIntake);
    }

    #[test]
    fn test_intake_sequence() {
        let mut rig = Rig::new();
        rig.tick();
        rig.settle();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Intaking);

        rig.tick();
        assert!(rig.intake.deployed);
        assert!(rig.flywheels.is_loading());

        rig.flywheels.sensor = true;
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
        assert!(!rig.intake.deployed);
        assert!(!rig.flywheels.is_loading());
    }

    #[test]
    fn test_tracking_aims_and_spins_up() {
        let rig = Rig::tracking();
        let solution = *rig.fc.solution().unwrap();
        assert_eq!(rig.turret.goal, solution.turret_angle);
        assert_eq!(rig.tilt.goal, solution.tilt_angle);
        assert!(solution.top_flywheel_speed > 0.0);
        assert_eq!(
            rig.flywheels.targets,
            (solution.top_flywheel_speed, solution.bottom_flywheel_speed)
        );
        assert!(rig.fc.get_target_position().is_some());
    }

    #[test]
    fn test_tracking_without_piece_stops_flywheels() {
        let mut rig = Rig::tracking();
        rig.flywheels.sensor = false;
        rig.tick();
        assert_eq!(rig.flywheels.targets, (0.0, 0.0));
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
    }

    #[test]
    fn test_shoot_ignored_when_not_ready() {
        let mut rig = Rig::tracking();
        rig.flywheels.at_speed = false;
        rig.fc.shoot();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
    }

    #[test]
    fn test_shoot_request_lasts_one_tick() {
        let mut rig = Rig::tracking();
        rig.fc.shoot();
        rig.tick();
        // Becomes ready a tick later, without a new request
        rig.flywheels.at_speed = true;
        rig.settle();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
    }

    #[test]
    fn test_shot_runs_for_configured_duration() {
        let mut rig = Rig::tracking();
        rig.flywheels.at_speed = true;
        rig.fc.shoot();
        let start = rig.now_us;
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Shooting);
        assert!(rig.flywheels.is_shooting());

        // Requests are ignored until the shot completes
        rig.fc.recover();
        rig.fc.intake();
        while rig.now_us < start + SHOT_US {
            rig.tick();
            assert_eq!(rig.fc.state(), FireControlState::Shooting);
            assert!(rig.flywheels.is_shooting());
        }
        assert_eq!(rig.now_us, start + SHOT_US);
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
        assert!(!rig.flywheels.is_shooting());
    }

    #[test]
    fn test_shot_reports_whether_piece_left() {
        let mut rig = Rig::tracking();
        rig.flywheels.at_speed = true;
        assert_eq!(rig.fc.last_shot_cleared(), None);

        rig.fc.shoot();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Shooting);
        rig.flywheels.sensor = false;
        rig.flywheels.cleared = true;
        for _ in 0..=(SHOT_US / TICK_US) {
            rig.tick();
        }
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
        assert_eq!(rig.fc.last_shot_cleared(), Some(true));

        // Piece stuck in the shooter
        rig.flywheels.sensor = true;
        rig.flywheels.cleared = false;
        rig.tick();
        rig.fc.shoot();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Shooting);
        for _ in 0..=(SHOT_US / TICK_US) {
            rig.tick();
        }
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
        assert_eq!(rig.fc.last_shot_cleared(), Some(false));
    }

    #[test]
    fn test_fixed_mount_never_flips() {
        let mut fc = FireControl::new(
            FireControlConfig::default(),
            TargetingConfig::default(),
            BallisticsConfig::default(),
            FiducialLayout::charged_up_2023(),
        );
        let mut turret = FixedMount::new(0.0);
        let tilt_config = TiltConfig::default();
        let mut tilt = FakeAxis::new(tilt_config.servo.limits, tilt_config.intake_angle);
        let mut flywheels = FakeFlywheels {
            sensor: true,
            at_speed: true,
            ..FakeFlywheels::default()
        };
        let mut intake = FakeIntake::default();
        // Red grid straight behind the shooter
        let pose = Pose2d::new(13.0, 2.75, core::f32::consts::PI);

        let mut now_us = 0;
        for _ in 0..4 {
            let mut mech = Mechanisms {
                turret: &mut turret,
                tilt: &mut tilt,
                flywheels: &mut flywheels,
                intake: &mut intake,
            };
            fc.execute(&mut mech, &pose, now_us);
            tilt.settle();
            now_us += TICK_US;
        }
        assert_eq!(fc.state(), FireControlState::Tracking);

        let solution = *fc.solution().unwrap();
        assert!(!solution.flipped);
        assert_eq!(solution.turret_angle, 0.0);
        assert!(solution.tilt_angle > 0.0);
        assert_eq!(turret.angle(), 0.0);
    }

    #[test]
    fn test_completed_shot_clears_manual_latch() {
        let mut rig = Rig::tracking();
        rig.flywheels.sensor = false;
        rig.flywheels.has_cube = true;
        rig.flywheels.at_speed = true;
        rig.tick();
        rig.fc.shoot();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Shooting);
        for _ in 0..=(SHOT_US / TICK_US) {
            rig.tick();
        }
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
        assert!(!rig.flywheels.has_cube);
    }

    #[test]
    fn test_recover_and_reintake() {
        let mut rig = Rig::tracking();
        rig.fc.recover();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Recovery);
        assert_eq!(rig.flywheels.targets, (0.0, 0.0));
        assert!(!rig.intake.deployed);

        // Stays put without a request
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Recovery);

        rig.fc.intake();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::PreparingIntake);
    }

    #[test]
    fn test_intake_ignored_while_loaded() {
        let mut rig = Rig::tracking();
        rig.fc.intake();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::Tracking);

        rig.flywheels.sensor = false;
        rig.fc.intake();
        rig.tick();
        assert_eq!(rig.fc.state(), FireControlState::PreparingIntake);
    }

    #[test]
    fn test_missing_fiducial_keeps_previous_solution() {
        let mut rig = Rig::tracking();
        let before = *rig.fc.solution().unwrap();
        rig.fc.layout().blind.set(true);
        rig.pose = Pose2d::new(12.0, 1.0, 0.5);
        rig.tick();
        rig.tick();
        assert_eq!(*rig.fc.solution().unwrap(), before);
        assert_eq!(rig.turret.goal, before.turret_angle);
        assert_eq!(rig.fc.state(), FireControlState::Tracking);
    }

    #[test]
    fn test_height_and_column_selection() {
        let mut rig = Rig::tracking();
        assert_eq!(rig.fc.goal_height(), GoalHeight::High);
        let high = rig.fc.get_target_position().unwrap();

        rig.fc.select_up();
        assert_eq!(rig.fc.goal_height(), GoalHeight::High);
        rig.fc.select_down();
        rig.fc.select_down();
        rig.fc.select_down();
        assert_eq!(rig.fc.goal_height(), GoalHeight::Low);

        rig.tick();
        let low = rig.fc.get_target_position().unwrap();
        assert!(low.z < high.z);

        rig.fc.select_left();
        rig.fc.select_left();
        assert_eq!(rig.fc.column(), GridColumn::Left);
        rig.fc.select_right();
        assert_eq!(rig.fc.column(), GridColumn::Centre);
    }

    #[test]
    fn test_alliance_selects_grid() {
        let mut rig = Rig::tracking();
        rig.fc.set_alliance(Alliance::Blue);
        rig.tick();
        let target = rig.fc.get_target_position().unwrap();
        assert!(target.x < 2.0);
    }
}
