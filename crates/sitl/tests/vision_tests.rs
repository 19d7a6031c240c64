use fire_control::subsystems::TurretAxis;
use fire_control_core::input::ButtonLevels;
use fire_control_sitl::{SimConfig, Simulation};

fn idle() -> ButtonLevels {
    ButtonLevels::default()
}

fn drifting(seed: u64) -> SimConfig {
    let mut config = SimConfig::default();
    config.chassis.drift = [0.05, -0.03, 0.0];
    for camera in config.cameras.iter_mut() {
        camera.seed = seed;
    }
    config
}

fn run_for(sim: &mut Simulation, seconds: f32) {
    let ticks = (seconds / 0.02) as usize;
    for _ in 0..ticks {
        sim.step(&idle());
    }
}

#[test]
fn test_no_fusion_before_index() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    sim.run_until("turret index", 5.0, &idle(), |s| {
        s.robot().turret().index_state().is_found()
    })
    .unwrap();
    assert_eq!(sim.chassis().fused(), 0);
}

#[test]
fn test_fuses_once_facing_the_grid() {
    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    sim.run_until("vision fused", 10.0, &idle(), |s| s.chassis().fused() > 0)
        .unwrap();
    let camera = &sim.robot().cameras()[0];
    assert_eq!(camera.name(), "turret");
    // The tag straight ahead is about 2.5 m away
    assert!(camera.last_range() > 2.0 && camera.last_range() < 3.0);
    assert!(camera.last_pose_z().abs() < 0.2);
    assert!(sim.chassis().estimate_error() < 0.1);
}

#[test]
fn test_vision_bounds_odometry_drift() {
    let mut with_vision = Simulation::new(drifting(3)).unwrap();
    let mut blind_config = drifting(3);
    blind_config.cameras.clear();
    let mut blind = Simulation::new(blind_config).unwrap();

    run_for(&mut with_vision, 8.0);
    run_for(&mut blind, 8.0);

    let blind_error = blind.chassis().estimate_error();
    let corrected_error = with_vision.chassis().estimate_error();
    assert!(blind_error > 0.4, "blind error {blind_error}");
    assert!(
        corrected_error < blind_error / 2.0,
        "corrected {corrected_error} vs blind {blind_error}"
    );
    assert_eq!(blind.chassis().fused(), 0);
}

#[test]
fn test_same_seed_same_run() {
    let mut a = Simulation::new(drifting(11)).unwrap();
    let mut b = Simulation::new(drifting(11)).unwrap();
    run_for(&mut a, 4.0);
    run_for(&mut b, 4.0);
    assert_eq!(a.chassis().estimate(), b.chassis().estimate());
    assert_eq!(a.chassis().fused(), b.chassis().fused());
}

#[test]
fn test_displaced_robot_recovered_by_vision() {
    use fire_control_core::geometry::Pose2d;

    let mut sim = Simulation::new(SimConfig::default()).unwrap();
    sim.run_until("vision fused", 10.0, &idle(), |s| s.chassis().fused() > 0)
        .unwrap();

    // Knocked sideways without odometry noticing; beyond the pose jump gate
    sim.chassis().displace(Pose2d::new(13.0, 1.5, 0.0));
    assert!(sim.chassis().estimate_error() > 1.0);
    sim.run_until("estimate recovered", 15.0, &idle(), |s| {
        s.chassis().estimate_error() < 0.2
    })
    .unwrap();
}
