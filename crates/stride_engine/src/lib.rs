//! # Stride Engine
//!
//! Collision registry and kinematic character locomotion.
//!
//! ## Features
//!
//! - **Collision Registry**: Box and sphere colliders with layer filtering,
//!   enter/stay/exit contact events, overlap and ray queries
//! - **Ground Probe**: Multi-ray ground detection with step-up and slope angles
//! - **Wall Resolver**: Post-move push-out that leaves floors to the probe
//! - **Locomotion**: Walking, sliding, climbing, flying and ghost movement
//!   driven by a per-tick input snapshot
//! - **Configuration**: TOML/RON settings with validation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stride_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut simulation = Simulation::new(SimulationConfig::default());
//!     simulation.add_collider(Collider::static_geometry(
//!         ColliderId(1),
//!         ColliderShape::cuboid(Vec3::new(20.0, 1.0, 20.0)),
//!         Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
//!     ))?;
//!
//!     let mut actors = vec![simulation.spawn_actor(ColliderId(100), Vec3::new(0.0, 2.0, 0.0))?];
//!     let input = InputSnapshot::new(InputIntents::FORWARD, CameraBasis::default(), simulation.clock().now());
//!
//!     let step = simulation.step(&mut actors, &[input], 1.0 / 60.0);
//!     println!("actor is {}", step.actors[0].state);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod foundation;
pub mod locomotion;
pub mod physics;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use simulation::{Simulation, SimulationStep};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, GroundProbeConfig, LocomotionConfig, SimulationConfig, WallResolverConfig},
        foundation::{
            math::{Quat, Transform, Vec3},
            time::{FixedTimestep, SimClock},
        },
        locomotion::{
            CameraBasis, CharacterController, GroundHit, GroundProbe, InputIntents, InputSnapshot, LadderVolume,
            LocomotionState, LocomotionStep, WallResolver,
        },
        physics::{
            Collider, ColliderError, ColliderId, ColliderShape, CollisionEvent, CollisionEventKind, CollisionLayers,
            CollisionRegistry,
        },
        Simulation, SimulationStep,
    };
}
