//! Run intake-and-shoot cycles against the simulated shooter.
//!
//! Usage:
//!   cargo run -p fire_control_sitl --bin sim_match -- [OPTIONS]
//!
//! Options:
//!   --seed <N>              Camera noise seed (default: 7)
//!   --cycles <N>            Intake/shoot cycles to run (default: 3)
//!   --alliance <red|blue>   Grid to score on (default: red)
//!   --drift <M/S>           Odometry drift along x (default: 0.0)
//!   --param <NAME=VALUE>    Override a tuning parameter (repeatable)

use std::env;
use std::f32::consts::PI;
use std::process;

use fire_control_core::geometry::Pose2d;
use fire_control_core::input::ButtonLevels;
use fire_control_core::parameters::{register_all, ParamValue, ParameterStore};
use fire_control_core::supervisor::FireControlState;
use fire_control_core::targeting::Alliance;
use fire_control_sitl::{SimConfig, Simulation, SimulationError};

struct Args {
    seed: u64,
    cycles: u32,
    alliance: Alliance,
    drift: f32,
    params: Vec<(String, String)>,
}

fn parse_args() -> Args {
    let mut args = Args {
        seed: 7,
        cycles: 3,
        alliance: Alliance::Red,
        drift: 0.0,
        params: Vec::new(),
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "--seed" => {
                i += 1;
                args.seed = parse_arg(&raw, i, "seed");
            }
            "--cycles" => {
                i += 1;
                args.cycles = parse_arg(&raw, i, "cycles");
            }
            "--drift" => {
                i += 1;
                args.drift = parse_arg(&raw, i, "drift");
            }
            "--alliance" => {
                i += 1;
                args.alliance = match value(&raw, i, "alliance") {
                    "red" => Alliance::Red,
                    "blue" => Alliance::Blue,
                    other => {
                        eprintln!("Error: unknown alliance '{other}'");
                        process::exit(1);
                    }
                };
            }
            "--param" => {
                i += 1;
                let Some((name, v)) = value(&raw, i, "param").split_once('=') else {
                    eprintln!("Error: --param expects NAME=VALUE");
                    process::exit(1);
                };
                args.params.push((name.to_string(), v.to_string()));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if args.cycles == 0 {
        eprintln!("Error: cycles must be at least 1");
        process::exit(1);
    }

    args
}

fn value<'a>(raw: &'a [String], i: usize, name: &str) -> &'a str {
    raw.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parse_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    value(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: sim_match [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --seed <N>              Camera noise seed (default: 7)\n\
         \x20 --cycles <N>            Intake/shoot cycles to run (default: 3)\n\
         \x20 --alliance <red|blue>   Grid to score on (default: red)\n\
         \x20 --drift <M/S>           Odometry drift along x (default: 0.0)\n\
         \x20 --param <NAME=VALUE>    Override a tuning parameter (repeatable)\n\
         \x20 -h, --help              Show this help"
    );
}

/// Parse an override with the type the parameter was registered with.
fn set_param(store: &mut ParameterStore, name: &str, raw: &str) -> Result<(), String> {
    let value = match store.get(name) {
        Some(ParamValue::Float(_)) => raw.parse().map(ParamValue::Float).ok(),
        Some(ParamValue::Int(_)) => raw.parse().map(ParamValue::Int).ok(),
        Some(ParamValue::Bool(_)) => raw.parse().map(ParamValue::Bool).ok(),
        None => return Err(format!("unknown parameter {name}")),
    };
    let value = value.ok_or_else(|| format!("invalid value '{raw}' for {name}"))?;
    store
        .set(name, value)
        .map_err(|e| format!("cannot set {name}: {e}"))
}

fn build_config(args: &Args) -> Result<SimConfig, SimulationError> {
    let mut store = ParameterStore::new();
    register_all(&mut store)?;
    for (name, raw) in &args.params {
        if let Err(e) = set_param(&mut store, name, raw) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    let mut config = SimConfig::default();
    config.apply_parameters(&store)?;
    config.alliance = args.alliance;
    if args.alliance == Alliance::Blue {
        // Mirror of the red start, facing the blue grid
        config.start_pose = Pose2d::new(3.5, 2.75, PI);
    }
    config.chassis.drift[0] = args.drift;
    for camera in config.cameras.iter_mut() {
        camera.seed = args.seed;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let mut sim = Simulation::new(build_config(args)?)?;
    let idle = ButtonLevels::default();
    let intake = ButtonLevels {
        intake: true,
        ..ButtonLevels::default()
    };

    for cycle in 1..=args.cycles {
        sim.tap(intake);
        sim.place_piece();
        let loaded = sim.run_until("piece loaded", 15.0, &idle, |s| {
            s.piece_loaded() && s.state() == FireControlState::Tracking
        })?;
        let fired = sim.fire(10.0)?;
        println!(
            "Cycle {cycle}: loaded in {loaded:.2} s, fired in {fired:.2} s, pose error {:.3} m",
            sim.chassis().estimate_error()
        );
    }

    println!();
    println!(
        "{:>4} {:>8} {:>10} {:>10} {:>10}",
        "shot", "t (s)", "aim (deg)", "tilt (deg)", "speed"
    );
    for (n, shot) in sim.shots().iter().enumerate() {
        println!(
            "{:>4} {:>8.2} {:>10.2} {:>10.2} {:>10.1}",
            n + 1,
            shot.time_us as f32 / 1_000_000.0,
            shot.aim_error().unwrap_or(f32::NAN).to_degrees(),
            shot.tilt_error().unwrap_or(f32::NAN).to_degrees(),
            shot.speed_error().unwrap_or(f32::NAN),
        );
    }
    println!(
        "Simulation complete. {} shots, {} vision updates, final time: {:.2} s",
        sim.shots().len(),
        sim.chassis().fused(),
        sim.time_s()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    println!("=== fire control match simulation ===");
    println!(
        "Alliance: {}, cycles: {}, seed: {}, drift: {} m/s",
        args.alliance.as_str(),
        args.cycles,
        args.seed,
        args.drift
    );
    println!();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
