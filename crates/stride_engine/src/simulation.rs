//! Fixed-order simulation step
//!
//! Ties a registry, the level's ladder volumes and any number of actors
//! together. Every step runs pair detection first, against the positions
//! the previous step left behind, and then each actor's locomotion update
//! in slice order.

use crate::config::SimulationConfig;
use crate::foundation::math::Vec3;
use crate::foundation::time::SimClock;
use crate::locomotion::{CharacterController, InputSnapshot, LadderVolume, LocomotionStep};
use crate::physics::{
    Collider, ColliderError, ColliderId, CollisionEvent, CollisionEventKind, CollisionRegistry, PositionCorrection,
};

/// Everything that happened during one step
#[derive(Debug, Clone, Default)]
pub struct SimulationStep {
    /// Contact events from pair detection
    pub events: Vec<CollisionEvent>,
    /// Corrections the registry applied to auto-resolved colliders
    pub corrections: Vec<PositionCorrection>,
    /// Per-actor results, in the order the actors were passed
    pub actors: Vec<LocomotionStep>,
}

/// One world: colliders, ladders and the simulation clock
#[derive(Debug)]
pub struct Simulation {
    registry: CollisionRegistry,
    ladders: Vec<LadderVolume>,
    config: SimulationConfig,
    clock: SimClock,
}

impl Simulation {
    /// Create an empty world
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            registry: CollisionRegistry::new(),
            ladders: Vec::new(),
            config,
            clock: SimClock::new(),
        }
    }

    /// Settings in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Collider store
    pub fn registry(&self) -> &CollisionRegistry {
        &self.registry
    }

    /// Mutable collider store, for level loading between steps
    pub fn registry_mut(&mut self) -> &mut CollisionRegistry {
        &mut self.registry
    }

    /// Register level geometry
    pub fn add_collider(&mut self, collider: Collider) -> Result<Option<Collider>, ColliderError> {
        self.registry.add(collider)
    }

    /// Add a ladder volume
    pub fn add_ladder(&mut self, ladder: LadderVolume) {
        self.ladders.push(ladder);
    }

    /// Ladder volumes in the level
    pub fn ladders(&self) -> &[LadderVolume] {
        &self.ladders
    }

    /// Create a player actor with its feet at `position`
    pub fn spawn_actor(&mut self, id: ColliderId, position: Vec3) -> Result<CharacterController, ColliderError> {
        CharacterController::spawn(&mut self.registry, id, position, &self.config)
    }

    /// Simulation clock, for stamping input snapshots
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Advance the world by `dt` seconds
    ///
    /// `inputs[i]` drives `actors[i]`; actors without an input stand idle.
    pub fn step(&mut self, actors: &mut [CharacterController], inputs: &[InputSnapshot], dt: f32) -> SimulationStep {
        let now = self.clock.advance(dt);

        let events = self.registry.tick();
        for event in &events {
            if event.kind != CollisionEventKind::Stay {
                log::debug!("Contact {:?}: {} / {}", event.kind, event.a, event.b);
            }
        }
        let corrections = self.registry.drain_corrections();

        let actor_steps = actors
            .iter_mut()
            .enumerate()
            .map(|(index, actor)| {
                let input = inputs.get(index).copied().unwrap_or_else(|| InputSnapshot::idle(now));
                actor.update(&mut self.registry, &self.ladders, &input, dt)
            })
            .collect();

        SimulationStep {
            events,
            corrections,
            actors: actor_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::locomotion::LocomotionState;
    use crate::physics::{ColliderShape, CollisionLayers};

    fn world() -> Simulation {
        let mut simulation = Simulation::new(SimulationConfig::default());
        simulation
            .add_collider(Collider::static_geometry(
                ColliderId(1),
                ColliderShape::cuboid(Vec3::new(40.0, 1.0, 40.0)),
                Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            ))
            .unwrap();
        simulation
    }

    #[test]
    fn test_actors_without_input_stand_idle() {
        let mut simulation = world();
        let mut actors = vec![
            simulation.spawn_actor(ColliderId(10), Vec3::new(-2.0, 0.0, 0.0)).unwrap(),
            simulation.spawn_actor(ColliderId(11), Vec3::new(2.0, 0.0, 0.0)).unwrap(),
        ];

        let step = simulation.step(&mut actors, &[], 1.0 / 60.0);
        assert_eq!(step.actors.len(), 2);
        assert!(actors.iter().all(|actor| actor.state() == LocomotionState::Grounded));
    }

    #[test]
    fn test_step_reports_contacts_and_clock() {
        let mut simulation = world();
        simulation
            .add_collider(
                Collider::new(ColliderId(50), ColliderShape::cuboid(Vec3::new(2.0, 2.0, 2.0)))
                    .with_layers(CollisionLayers::TRIGGER, CollisionLayers::all())
                    .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
                    .as_sensor(),
            )
            .unwrap();
        let mut actors = vec![simulation.spawn_actor(ColliderId(10), Vec3::zeros()).unwrap()];

        let first = simulation.step(&mut actors, &[], 0.5);
        assert!(first
            .events
            .iter()
            .any(|event| event.kind == CollisionEventKind::Enter && event.involves(ColliderId(10))));
        assert!(first.corrections.is_empty());
        assert_eq!(simulation.clock().elapsed(), std::time::Duration::from_secs_f32(0.5));
    }
}
