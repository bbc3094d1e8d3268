//! Headless locomotion sandbox
//!
//! Loads settings, builds the test level, then drives one player through a
//! scripted tour using the fixed-step loop. State changes and contact
//! events are logged; run with `RUST_LOG=debug` for every transition.
//!
//! Usage: `stride_sandbox [settings.toml|settings.ron]`

mod level;
mod script;

use std::path::{Path, PathBuf};

use stride_engine::debug::CollisionDebugVisualizer;
use stride_engine::foundation::logging;
use stride_engine::physics::{ColliderError, ColliderId};
use stride_engine::prelude::{
    CharacterController, CollisionEvent, CollisionEventKind, Config, ConfigError, FixedTimestep, Simulation, SimulationConfig,
};

use level::Level;
use script::Script;

const DEFAULT_SETTINGS: &str = "stride_sandbox/sandbox.toml";
const PLAYER: ColliderId = ColliderId(100);

/// Uneven frame times, as a real render loop would produce
const FRAME_TIMES: [f32; 5] = [1.0 / 50.0, 1.0 / 90.0, 1.0 / 60.0, 1.0 / 40.0, 1.0 / 75.0];

/// Sandbox failures
#[derive(thiserror::Error, Debug)]
enum SandboxError {
    #[error("Settings error: {0}")]
    Config(#[from] ConfigError),

    #[error("Level error: {0}")]
    Collider(#[from] ColliderError),
}

fn main() -> Result<(), SandboxError> {
    let path = std::env::args().nth(1).map_or_else(|| PathBuf::from(DEFAULT_SETTINGS), PathBuf::from);
    let (config, loaded) = load_settings(&path)?;

    logging::init(&config.log_level);
    if loaded {
        log::info!("Settings loaded from {}", path.display());
    } else {
        log::warn!("{} not found, using built-in settings", path.display());
    }

    let result = run(config);
    if let Err(e) = &result {
        log::error!("Sandbox failed: {}", e);
    }
    result
}

/// Load settings, falling back to defaults only when the file is missing
fn load_settings(path: &Path) -> Result<(SimulationConfig, bool), ConfigError> {
    if path.exists() {
        Ok((SimulationConfig::load_from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

fn run(config: SimulationConfig) -> Result<(), SandboxError> {
    let mut timestep = FixedTimestep::new(config.tick_rate_hz);
    let dt = timestep.step();

    let mut simulation = Simulation::new(config);
    let level = level::build(&mut simulation)?;
    let mut actors = vec![simulation.spawn_actor(PLAYER, level::spawn_point())?];
    let script = Script::tour();
    let mut debug = CollisionDebugVisualizer::new();

    let mut sim_time = 0.0_f32;
    let mut frames = 0_usize;
    while sim_time < script.duration() {
        let frame_time = FRAME_TIMES[frames % FRAME_TIMES.len()];
        frames += 1;

        for _ in 0..timestep.advance(frame_time) {
            let from = sim_time;
            sim_time += dt;

            script.apply_toggles(from, sim_time, &mut actors[0]);
            let input = script.snapshot(from, sim_time, simulation.clock().now());
            let step = simulation.step(&mut actors, &[input], dt);

            for event in step.events.iter().filter(|event| event.kind != CollisionEventKind::Stay) {
                log::info!("t={:.2}s contact {:?} {} / {}", sim_time, event.kind, event.a, event.b);
            }
            for actor_step in step.actors.iter().filter(|actor_step| actor_step.changed_state()) {
                log::info!(
                    "t={:.2}s {} -> {}{}",
                    sim_time,
                    actor_step.previous_state,
                    actor_step.state,
                    if actor_step.flight_toggled { " (double tap)" } else { "" }
                );
            }
            launch_from_pads(&level, &step.events, &mut actors);

            debug.draw_registry(simulation.registry());
            for actor in &actors {
                debug.draw_actor(actor, simulation.registry());
                if !actor.state().is_free_flight() {
                    debug.draw_ground_probe(actor.probe(), actor.position(), actor.ground());
                }
            }
            debug.update(dt);
        }
    }

    debug.draw_ladders(simulation.ladders());
    let player = &actors[0];
    log::info!(
        "Finished after {} steps over {} frames: player {} at ({:.2}, {:.2}, {:.2}), {} debug shapes",
        timestep.total_steps(),
        frames,
        player.state(),
        player.position().x,
        player.position().y,
        player.position().z,
        debug.shapes().len()
    );
    Ok(())
}

/// Hand each pad's impulse to actors that just entered it
fn launch_from_pads(level: &Level, events: &[CollisionEvent], actors: &mut [CharacterController]) {
    for event in events.iter().filter(|event| event.kind == CollisionEventKind::Enter) {
        for actor in actors.iter_mut() {
            let pad = if event.a == actor.collider() {
                level.jump_pad(event.b)
            } else if event.b == actor.collider() {
                level.jump_pad(event.a)
            } else {
                None
            };
            if let Some(pad) = pad {
                log::info!("Jump pad {} launches {}", pad.id, actor.collider());
                actor.apply_impulse(pad.impulse);
            }
        }
    }
}
