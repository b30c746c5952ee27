//! Poke simulator entry point
//!
//! Runs a scripted, seeded session against one poke button: a pressing finger
//! with tracking jitter and a second finger hovering shallow beside it.
//!
//! Usage: `poke-sim [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod sim {
    use glam::Vec3;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use poke_logic::poke::{
        ColliderShape, InteractionSample, InteractorId, PokeLogic, ShapeTransform, TargetId,
    };
    use poke_logic::{PokeAxis, PokeThresholdConfig, Pose};

    /// Tracking rate of the simulated headset
    const DT: f32 = 1.0 / 90.0;
    const TICKS: u32 = 180;
    /// Positional tracking noise (meters)
    const JITTER: f32 = 0.0015;
    /// Fingers closer than this to the button face hover it
    const HOVER_ENTER_DISTANCE: f32 = 0.05;
    const HOVER_EXIT_DISTANCE: f32 = 0.06;

    const BUTTON: TargetId = TargetId(1);

    struct Finger {
        id: InteractorId,
        /// Scripted path: position at tick
        path: fn(u32) -> Vec3,
        last_position: Option<Vec3>,
        hovering: bool,
    }

    /// Approaches, presses 5 mm past the face, then retracts
    fn pressing_path(tick: u32) -> Vec3 {
        let t = tick as f32 / TICKS as f32;
        let z = if t < 0.5 {
            0.1 - (0.105 * t / 0.5)
        } else {
            -0.005 + 0.105 * (t - 0.5) / 0.5
        };
        Vec3::new(0.0, 0.0, z)
    }

    /// Drifts in beside the button and hangs around 2-4 cm out
    fn hovering_path(tick: u32) -> Vec3 {
        let t = tick as f32 * DT;
        Vec3::new(0.03, 0.0, 0.03 + 0.01 * (t * 3.0).sin())
    }

    pub fn run(seed: u64, config: PokeThresholdConfig) {
        let mut rng = Pcg32::seed_from_u64(seed);

        let collider = ColliderShape::Box {
            center: Vec3::new(0.0, 0.0, 0.015),
            size: Vec3::new(0.08, 0.08, 0.03),
        };
        let mut logic = PokeLogic::new();
        logic.initialize(Pose::IDENTITY, config, Some((&collider, &ShapeTransform::default())));

        logic.subscribe(|state| {
            if let Some(target) = state.target {
                log::debug!(
                    "target {} strength {:.3} pressed {}",
                    target.0,
                    state.interaction_strength,
                    state.meets_requirements
                );
            }
        });

        let mut fingers = [
            Finger {
                id: InteractorId(1),
                path: pressing_path,
                last_position: None,
                hovering: false,
            },
            Finger {
                id: InteractorId(2),
                path: hovering_path,
                last_position: None,
                hovering: false,
            },
        ];

        let mut presses = 0u32;
        let mut pressed = false;

        for tick in 0..TICKS {
            let mut samples = Vec::with_capacity(fingers.len());

            for finger in fingers.iter_mut() {
                let noise = Vec3::new(
                    rng.random_range(-JITTER..JITTER),
                    rng.random_range(-JITTER..JITTER),
                    rng.random_range(-JITTER..JITTER),
                );
                let position = (finger.path)(tick) + noise;
                let velocity = finger.last_position.map(|last| (position - last) / DT);
                finger.last_position = Some(position);

                let distance = position.z;
                if !finger.hovering && distance < HOVER_ENTER_DISTANCE {
                    finger.hovering = true;
                    logic.on_hover_entered(finger.id, Pose::IDENTITY, BUTTON);
                    log::info!("tick {tick}: finger {} hover enter", finger.id.0);
                } else if finger.hovering && distance > HOVER_EXIT_DISTANCE {
                    finger.hovering = false;
                    logic.on_hover_exited(finger.id);
                    log::info!("tick {tick}: finger {} hover exit", finger.id.0);
                }

                if finger.hovering {
                    let mut sample =
                        InteractionSample::new(finger.id, BUTTON, position, Vec3::ZERO);
                    sample.velocity = velocity;
                    samples.push(sample);
                }
            }

            logic.evaluate_tick(&samples);

            let state = logic.poke_state();
            if state.meets_requirements != pressed {
                pressed = state.meets_requirements;
                if pressed {
                    presses += 1;
                }
                log::info!(
                    "tick {tick}: button {}",
                    if pressed { "PRESSED" } else { "released" }
                );
            }
        }

        for finger in &fingers {
            logic.on_hover_exited(finger.id);
        }

        println!("Simulated {TICKS} ticks (seed {seed}), {presses} press(es)");
        match serde_json::to_string_pretty(&logic.poke_state()) {
            Ok(json) => println!("Final poke state:\n{json}"),
            Err(e) => log::error!("Failed to serialize poke state: {e}"),
        }
    }

    pub fn default_config() -> PokeThresholdConfig {
        PokeThresholdConfig::with_axis(PokeAxis::NegativeZ)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Poke simulator starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("Invalid seed {arg:?}, expected an unsigned integer");
                std::process::exit(2);
            }
        },
        None => 12345,
    };

    let config = match args.next() {
        Some(path) => match poke_logic::PokeThresholdConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => sim::default_config(),
    };

    sim::run(seed, config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulator is native-only
}
