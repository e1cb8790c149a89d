mod scenario;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use game_common::math::RotationExt;
use game_locomotion::{
    AnimationSink, AnimatorQuery, CapsuleDimensions, LocomotionConfig, LocomotionController,
    Parameter, ParameterStore,
};
use game_physics::{PhysicsWorld, RapierBody, RapierGroundSensor, SharedWorld};
use glam::Vec3;
use scenario::Scenario;
use tracing::metadata::LevelFilter;
use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::SubscriberExt;

const DT: f32 = 1.0 / 60.0;
const HEIGHT: f32 = 1.8;
const RADIUS: f32 = 0.3;
/// Root speed of the walk cycle at a `Forward` value of one.
const WALK_SPEED: f32 = 1.5;
const CYCLE_LENGTH: f32 = 1.0;
const AIRBORNE_STATE: &str = "Airborne";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with the locomotion config.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,
    #[arg(short, long, value_enum, default_value_t = Scenario::Walk)]
    scenario: Scenario,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let args = Args::parse();
    run(&args)
}

fn init_logger() {
    let level = std::env::var("RUST_LOG")
        .map(|e| match e.as_str() {
            "error" | "ERROR" => LevelFilter::ERROR,
            "warn" | "WARN" => LevelFilter::WARN,
            "debug" | "DEBUG" => LevelFilter::DEBUG,
            "trace" | "TRACE" => LevelFilter::TRACE,
            "off" | "OFF" => LevelFilter::OFF,
            _ => LevelFilter::INFO,
        })
        .unwrap_or(LevelFilter::INFO);

    let layer = tracing_subscriber::registry()
        .with(level)
        .with(tracing_subscriber::fmt::layer());

    if let Err(err) = set_global_default(layer) {
        eprintln!("failed to install logger: {}", err);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => LocomotionConfig::from_file(path)?,
        // The character spawns with its feet exactly where a probe of the
        // default length ends and would miss the floor by rounding.
        None => LocomotionConfig {
            ground_check_distance: 0.2,
            ..Default::default()
        },
    };
    let grounded_state = config.grounded_state.clone();

    let world = build_world();
    let capsule = CapsuleDimensions::new(HEIGHT, RADIUS);
    let handle = world.lock().add_character(Vec3::ZERO, capsule);

    let animator = SimAnimator::new(ParameterStore::new(grounded_state.clone(), CYCLE_LENGTH));

    let mut controller = LocomotionController::builder(config)
        .capsule(capsule)
        .ground_sensor(Box::new(RapierGroundSensor::new(world.clone(), handle.body)))
        .kinematics(Box::new(RapierBody::new(world.clone(), handle)))
        .animator(Box::new(animator.clone()))
        .build()?;

    tracing::info!(
        "running {:?} scenario for {} ticks",
        args.scenario,
        args.ticks
    );

    for tick in 0..args.ticks {
        let input = args.scenario.input(tick, args.ticks);
        controller.step(input.movement, input.crouch, input.jump, DT);

        let delta = {
            let mut store = animator.0.borrow_mut();
            let on_ground = store.bool(Parameter::OnGround).unwrap_or(false);
            if on_ground && !store.is_in_state(&grounded_state) {
                store.play(grounded_state.as_str());
            } else if !on_ground && store.is_in_state(&grounded_state) {
                store.play(AIRBORNE_STATE);
            }
            store.advance(DT);

            let forward = store.float(Parameter::Forward).unwrap_or(0.0);
            let facing = controller.kinematics().rotation().forward();
            facing * forward * WALK_SPEED * store.speed() * DT
        };

        controller.commit_root_motion(delta);
        world.lock().step(DT);

        let state = controller.state();
        tracing::info!(
            "tick {}: position={} grounded={} crouching={} forward={:.3} turn={:.3}",
            tick,
            controller.kinematics().position(),
            state.is_grounded,
            state.is_crouching,
            state.forward_amount,
            state.turn_amount,
        );
    }

    Ok(())
}

/// A floor with a low tunnel ahead of the character.
fn build_world() -> SharedWorld {
    let mut world = PhysicsWorld::new();
    world.add_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
    world.add_fixed_cuboid(Vec3::new(0.0, 1.7, 6.0), Vec3::new(3.0, 0.2, 2.0));
    world.into_shared()
}

/// A [`ParameterStore`] shared between the controller and the loop playing
/// the animation states.
#[derive(Clone, Debug)]
struct SimAnimator(Rc<RefCell<ParameterStore>>);

impl SimAnimator {
    fn new(store: ParameterStore) -> Self {
        Self(Rc::new(RefCell::new(store)))
    }
}

impl AnimatorQuery for SimAnimator {
    fn is_in_state(&self, name: &str) -> bool {
        self.0.borrow().is_in_state(name)
    }

    fn normalized_cycle_phase(&self) -> f32 {
        self.0.borrow().normalized_cycle_phase()
    }
}

impl AnimationSink for SimAnimator {
    fn set_float(&mut self, parameter: Parameter, value: f32) {
        self.0.borrow_mut().set_float(parameter, value);
    }

    fn set_bool(&mut self, parameter: Parameter, value: bool) {
        self.0.borrow_mut().set_bool(parameter, value);
    }

    fn set_speed(&mut self, speed: f32) {
        self.0.borrow_mut().set_speed(speed);
    }

    fn set_apply_root_motion(&mut self, enabled: bool) {
        self.0.borrow_mut().set_apply_root_motion(enabled);
    }
}
