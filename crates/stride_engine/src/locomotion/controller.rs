//! Kinematic character controller
//!
//! One [`CharacterController`] per actor. Each fixed step it reads an
//! [`InputSnapshot`], picks the behavior for its [`LocomotionState`], probes
//! for ground, folds in momentum, moves, and lets the wall resolver push it
//! back out of level geometry. The registry is passed in explicitly; the
//! controller owns the authoritative position and keeps its collider in sync.

use crate::config::{LocomotionConfig, SimulationConfig};
use crate::foundation::math::{self, Transform, Vec3};
use crate::locomotion::ground_probe::{GroundHit, GroundProbe};
use crate::locomotion::input::{DoubleTapDetector, InputSnapshot};
use crate::locomotion::ladder::LadderVolume;
use crate::locomotion::momentum::Momentum;
use crate::locomotion::slope::{self, SlopeClass};
use crate::locomotion::state::{LocomotionState, LocomotionStep};
use crate::locomotion::wall_resolver::WallResolver;
use crate::physics::{Collider, ColliderError, ColliderId, ColliderShape, CollisionLayers, CollisionRegistry};

/// How far above the ground a falling actor may be and still land this tick
const LANDING_TOLERANCE: f32 = 0.05;

/// Kinematic locomotion for a single actor
#[derive(Debug, Clone)]
pub struct CharacterController {
    collider: ColliderId,
    /// Feet position
    position: Vec3,
    state: LocomotionState,
    vertical_velocity: f32,
    slide_velocity: Vec3,
    momentum: Momentum,
    ground: GroundHit,
    in_ladder: bool,
    /// Jump button state at the previous update
    jump_held: bool,
    double_tap: DoubleTapDetector,
    config: LocomotionConfig,
    probe: GroundProbe,
    resolver: WallResolver,
}

impl CharacterController {
    /// Create a controller with its feet at `position`
    ///
    /// The actor starts airborne and the first probe decides where it
    /// stands. Its collider is not registered; see [`Self::spawn`].
    pub fn new(collider: ColliderId, position: Vec3, config: &SimulationConfig) -> Self {
        let locomotion = config.locomotion.clone();
        Self {
            collider,
            position,
            state: LocomotionState::Airborne,
            vertical_velocity: 0.0,
            slide_velocity: Vec3::zeros(),
            momentum: Momentum::new(locomotion.momentum_damping, locomotion.momentum_epsilon),
            ground: GroundHit::none(),
            in_ladder: false,
            jump_held: false,
            double_tap: DoubleTapDetector::new(locomotion.double_tap_window()),
            probe: GroundProbe::new(config.probe.clone()),
            resolver: WallResolver::new(config.resolver.clone()),
            config: locomotion,
        }
    }

    /// Create a player controller and register its collider
    pub fn spawn(
        registry: &mut CollisionRegistry,
        collider: ColliderId,
        position: Vec3,
        config: &SimulationConfig,
    ) -> Result<Self, ColliderError> {
        let controller = Self::new(collider, position, config);
        registry.add(controller.body_collider(CollisionLayers::PLAYER))?;
        Ok(controller)
    }

    /// The actor's collision sphere on `layer`
    ///
    /// The actor resolves its own penetration, so the collider is marked for
    /// manual resolution and the registry never moves it.
    pub fn body_collider(&self, layer: CollisionLayers) -> Collider {
        Collider::new(self.collider, ColliderShape::sphere(self.config.body_radius))
            .with_layers(layer, CollisionLayers::all())
            .with_offset(Vec3::new(0.0, self.config.body_center_height, 0.0))
            .with_transform(Transform::from_position(self.position))
            .with_manual_resolution()
    }

    /// Collider id of this actor
    pub fn collider(&self) -> ColliderId {
        self.collider
    }

    /// Feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport the feet; the collider follows on the next update
    pub fn set_position(&mut self, position: Vec3) {
        if math::is_finite_vec(&position) {
            self.position = position;
        }
    }

    /// Active state
    pub fn state(&self) -> LocomotionState {
        self.state
    }

    /// Current vertical velocity (m/s)
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Accumulated downhill velocity while sliding
    pub fn slide_velocity(&self) -> Vec3 {
        self.slide_velocity
    }

    /// Remaining impulse momentum
    pub fn momentum(&self) -> Vec3 {
        self.momentum.velocity()
    }

    /// Last ground probe result
    pub fn ground(&self) -> &GroundHit {
        &self.ground
    }

    /// The chest point was inside a ladder volume at the last update
    pub fn in_ladder(&self) -> bool {
        self.in_ladder
    }

    /// Movement tuning in use
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Ground probe in use (for debug drawing)
    pub fn probe(&self) -> &GroundProbe {
        &self.probe
    }

    /// Apply an external impulse (jump pad, knockback)
    ///
    /// The horizontal part becomes momentum. A vertical part replaces the
    /// vertical velocity and knocks a standing or climbing actor airborne;
    /// flying and ghost actors keep their mode.
    pub fn apply_impulse(&mut self, force: Vec3) {
        if !math::is_finite_vec(&force) {
            log::warn!("Actor {}: ignored non-finite impulse", self.collider);
            return;
        }

        self.momentum.add(math::horizontal(force));
        if force.y != 0.0 {
            self.vertical_velocity = force.y;
            if matches!(
                self.state,
                LocomotionState::Grounded | LocomotionState::Sliding | LocomotionState::Climbing
            ) {
                self.slide_velocity = Vec3::zeros();
                self.set_state(LocomotionState::Airborne);
            }
        }
    }

    /// Enter or leave ghost mode
    ///
    /// Leaving ghost mode drops the actor into the air; the next probe
    /// decides whether it stands.
    pub fn set_ghost(&mut self, enabled: bool) {
        if enabled && self.state != LocomotionState::Ghost {
            self.vertical_velocity = 0.0;
            self.slide_velocity = Vec3::zeros();
            self.double_tap.reset();
            self.set_state(LocomotionState::Ghost);
        } else if !enabled && self.state == LocomotionState::Ghost {
            self.vertical_velocity = 0.0;
            self.set_state(LocomotionState::Airborne);
        }
    }

    /// Ghost mode is active
    pub fn is_ghost(&self) -> bool {
        self.state == LocomotionState::Ghost
    }

    /// Advance the actor by one fixed step
    pub fn update(
        &mut self,
        registry: &mut CollisionRegistry,
        ladders: &[LadderVolume],
        input: &InputSnapshot,
        dt: f32,
    ) -> LocomotionStep {
        let previous_state = self.state;
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        // Only the press itself jumps; holding the button does nothing more
        let held = input.intents.jump_held();
        let mut jump = held && !self.jump_held;
        self.jump_held = held;

        let flight_toggled = jump && self.handle_double_tap(input);
        if flight_toggled {
            jump = false;
        }

        self.update_ladder_contact(ladders);
        let momentum = self.momentum.tick(dt);

        let (mut displacement, ground) = if self.state.is_free_flight() {
            (
                input.camera.look_relative(input.intents) * self.config.fly_speed * dt,
                GroundHit::none(),
            )
        } else if self.state == LocomotionState::Climbing {
            self.move_climbing(registry, input, jump, dt)
        } else {
            self.move_on_foot(registry, input, jump, dt)
        };
        if self.state != LocomotionState::Ghost && !self.momentum.is_zero() {
            displacement += momentum * dt;
        }

        self.position += displacement;
        registry.set_transform(self.collider, Transform::from_position(self.position));

        let push_out = if self.state.resolves_walls() {
            self.resolver.resolve(registry, self.collider)
        } else {
            Vec3::zeros()
        };
        if push_out != Vec3::zeros() {
            self.position += push_out;
            let wall_normal = math::normalize_or(push_out, Vec3::zeros());
            self.momentum.block(&wall_normal);
            self.slide_velocity = slope::remove_into_surface(self.slide_velocity, &wall_normal);
        }

        self.ground = ground;
        LocomotionStep {
            state: self.state,
            previous_state,
            displacement: displacement + push_out,
            push_out,
            ground,
            flight_toggled,
        }
    }

    /// Feed a jump press to the double-tap detector; toggles flight on a hit
    fn handle_double_tap(&mut self, input: &InputSnapshot) -> bool {
        if self.state == LocomotionState::Ghost || !self.double_tap.register(input.timestamp) {
            return false;
        }

        if self.state == LocomotionState::Flying {
            self.set_state(LocomotionState::Airborne);
        } else {
            self.vertical_velocity = 0.0;
            self.slide_velocity = Vec3::zeros();
            self.set_state(LocomotionState::Flying);
        }
        log::debug!("Actor {}: flight toggled ({})", self.collider, self.state);
        true
    }

    /// Track chest containment and enter or leave climbing on its edges
    fn update_ladder_contact(&mut self, ladders: &[LadderVolume]) {
        let chest = self.position + math::up() * self.config.chest_height;
        let in_ladder = LadderVolume::any_contains(ladders, chest, self.config.ladder_margin);
        let entered = in_ladder && !self.in_ladder;
        self.in_ladder = in_ladder;

        if self.state == LocomotionState::Climbing && !in_ladder {
            self.set_state(LocomotionState::Airborne);
        } else if entered
            && matches!(
                self.state,
                LocomotionState::Grounded | LocomotionState::Airborne | LocomotionState::Sliding
            )
        {
            self.vertical_velocity = 0.0;
            self.slide_velocity = Vec3::zeros();
            self.set_state(LocomotionState::Climbing);
        }
    }

    fn move_on_foot(
        &mut self,
        registry: &CollisionRegistry,
        input: &InputSnapshot,
        jump: bool,
        dt: f32,
    ) -> (Vec3, GroundHit) {
        let ground = self.probe.probe(registry, self.position, Some(self.collider));
        let wish = input.camera.yaw_relative(input.intents) * self.config.walk_speed;
        let class = slope::classify(&ground.normal, self.config.max_walk_angle());

        if self.state.is_supported() {
            if !ground.is_grounded {
                // Walked off an edge; keeps the stick velocity as a head start
                self.set_state(LocomotionState::Airborne);
            } else if jump && class == SlopeClass::Walkable {
                self.vertical_velocity = self.config.jump_velocity;
                self.slide_velocity = Vec3::zeros();
                self.set_state(LocomotionState::Airborne);
                return ((wish + math::up() * self.vertical_velocity) * dt, ground);
            } else {
                let displacement = match class {
                    SlopeClass::Walkable => self.walk(&ground, wish, dt),
                    SlopeClass::TooSteep => self.slide(&ground, wish, dt),
                };
                return (displacement, ground);
            }
        }

        (self.fall(&ground, class, wish, dt), ground)
    }

    fn walk(&mut self, ground: &GroundHit, wish: Vec3, dt: f32) -> Vec3 {
        self.set_state(LocomotionState::Grounded);
        self.slide_velocity = Vec3::zeros();
        self.vertical_velocity = -self.config.ground_stick_velocity;

        let mut displacement = slope::project_on_plane(wish, &ground.normal) * dt;
        displacement.y += ground.ground_height - self.position.y;
        displacement
    }

    fn slide(&mut self, ground: &GroundHit, wish: Vec3, dt: f32) -> Vec3 {
        self.set_state(LocomotionState::Sliding);
        self.slide_velocity += slope::downhill(&ground.normal) * self.config.slide_acceleration * dt;
        self.apply_gravity(dt);

        let velocity = wish + self.slide_velocity + math::up() * self.vertical_velocity;
        slope::remove_into_surface(velocity, &ground.normal) * dt
    }

    fn fall(&mut self, ground: &GroundHit, class: SlopeClass, wish: Vec3, dt: f32) -> Vec3 {
        self.apply_gravity(dt);
        let mut displacement = (wish + math::up() * self.vertical_velocity) * dt;

        let lands = ground.is_grounded
            && self.vertical_velocity <= 0.0
            && self.position.y + displacement.y <= ground.ground_height + LANDING_TOLERANCE;
        if lands {
            displacement.y = ground.ground_height - self.position.y;
            match class {
                SlopeClass::Walkable => {
                    self.vertical_velocity = -self.config.ground_stick_velocity;
                    self.slide_velocity = Vec3::zeros();
                    self.set_state(LocomotionState::Grounded);
                }
                SlopeClass::TooSteep => self.set_state(LocomotionState::Sliding),
            }
        }
        displacement
    }

    fn move_climbing(
        &mut self,
        registry: &CollisionRegistry,
        input: &InputSnapshot,
        jump: bool,
        dt: f32,
    ) -> (Vec3, GroundHit) {
        if jump {
            self.vertical_velocity = self.config.climb_jump_velocity;
            self.set_state(LocomotionState::Airborne);
            return (math::up() * self.vertical_velocity * dt, GroundHit::none());
        }

        self.vertical_velocity = input.intents.forward_axis() * self.config.climb_speed;
        let strafe = input.camera.right * input.intents.strafe_axis() * self.config.climb_strafe_speed;
        let mut displacement = (strafe + math::up() * self.vertical_velocity) * dt;

        // The floor still holds a climber who backs down past it
        let ground = self.probe.probe(registry, self.position, Some(self.collider));
        if ground.is_grounded && self.position.y + displacement.y < ground.ground_height {
            displacement.y = ground.ground_height - self.position.y;
        }
        (displacement, ground)
    }

    fn apply_gravity(&mut self, dt: f32) {
        if !self.state.uses_gravity() {
            return;
        }
        self.vertical_velocity =
            (self.vertical_velocity - self.config.gravity * dt).max(-self.config.terminal_velocity);
    }

    fn set_state(&mut self, next: LocomotionState) {
        if next != self.state {
            log::debug!("Actor {}: {} -> {}", self.collider, self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::input::{CameraBasis, InputIntents};
    use std::time::Instant;

    fn floor() -> CollisionRegistry {
        let mut registry = CollisionRegistry::new();
        registry
            .add(Collider::static_geometry(
                ColliderId(1),
                ColliderShape::cuboid(Vec3::new(40.0, 1.0, 40.0)),
                Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            ))
            .unwrap();
        registry
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::idle(Instant::now())
    }

    #[test]
    fn test_spawn_registers_manual_sphere() {
        let mut registry = floor();
        let actor =
            CharacterController::spawn(&mut registry, ColliderId(10), Vec3::zeros(), &SimulationConfig::default()).unwrap();

        let collider = registry.get(actor.collider()).unwrap();
        assert!(collider.manual_resolution);
        assert_eq!(collider.layer, CollisionLayers::PLAYER);
        assert!(matches!(collider.shape, ColliderShape::Sphere { .. }));
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let mut registry = floor();
        let mut actor = CharacterController::spawn(
            &mut registry,
            ColliderId(10),
            Vec3::new(0.0, 0.4, 0.0),
            &SimulationConfig::default(),
        )
        .unwrap();

        for _ in 0..60 {
            actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);
        }
        assert_eq!(actor.state(), LocomotionState::Grounded);
        assert!(actor.position().y.abs() < 1e-4);
        assert!(actor.ground().is_grounded);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut registry = floor();
        let mut actor =
            CharacterController::spawn(&mut registry, ColliderId(10), Vec3::zeros(), &SimulationConfig::default()).unwrap();
        actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);
        assert_eq!(actor.state(), LocomotionState::Grounded);

        let jump = InputSnapshot::new(InputIntents::JUMP, CameraBasis::default(), Instant::now());
        let step = actor.update(&mut registry, &[], &jump, 1.0 / 60.0);
        assert_eq!(step.previous_state, LocomotionState::Grounded);
        assert_eq!(step.state, LocomotionState::Airborne);
        assert!(step.displacement.y > 0.0);
        assert!(!step.flight_toggled);
    }

    #[test]
    fn test_held_jump_jumps_once() {
        let mut registry = floor();
        let mut actor =
            CharacterController::spawn(&mut registry, ColliderId(10), Vec3::zeros(), &SimulationConfig::default()).unwrap();
        actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);

        let jump = InputSnapshot::new(InputIntents::JUMP, CameraBasis::default(), Instant::now());
        actor.update(&mut registry, &[], &jump, 1.0 / 60.0);
        let rising = actor.vertical_velocity();

        let step = actor.update(&mut registry, &[], &jump, 1.0 / 60.0);
        assert_eq!(step.state, LocomotionState::Airborne);
        assert!(!step.flight_toggled);
        assert!(actor.vertical_velocity() < rising);
    }

    #[test]
    fn test_vertical_impulse_knocks_airborne() {
        let mut registry = floor();
        let mut actor =
            CharacterController::spawn(&mut registry, ColliderId(10), Vec3::zeros(), &SimulationConfig::default()).unwrap();
        actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);

        actor.apply_impulse(Vec3::new(4.0, 12.0, 0.0));
        assert_eq!(actor.state(), LocomotionState::Airborne);
        assert_eq!(actor.vertical_velocity(), 12.0);
        assert_eq!(actor.momentum(), Vec3::new(4.0, 0.0, 0.0));

        let step = actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);
        assert!(step.displacement.x > 0.0 && step.displacement.y > 0.0);
    }

    #[test]
    fn test_horizontal_impulse_keeps_flying() {
        let mut actor = CharacterController::new(ColliderId(10), Vec3::zeros(), &SimulationConfig::default());
        let start = Instant::now();
        let jump = |at| InputSnapshot::new(InputIntents::JUMP, CameraBasis::default(), at);
        let mut registry = CollisionRegistry::new();

        actor.update(&mut registry, &[], &jump(start), 1.0 / 60.0);
        actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);
        actor.update(&mut registry, &[], &jump(start + std::time::Duration::from_millis(100)), 1.0 / 60.0);
        assert_eq!(actor.state(), LocomotionState::Flying);

        actor.apply_impulse(Vec3::new(0.0, 5.0, 3.0));
        assert_eq!(actor.state(), LocomotionState::Flying);
    }

    #[test]
    fn test_ghost_toggle() {
        let mut actor = CharacterController::new(ColliderId(10), Vec3::zeros(), &SimulationConfig::default());
        actor.set_ghost(true);
        assert!(actor.is_ghost());

        // Jump presses never toggle flight while ghosted
        let mut registry = CollisionRegistry::new();
        let now = Instant::now();
        let jump = InputSnapshot::new(InputIntents::JUMP, CameraBasis::default(), now);
        actor.update(&mut registry, &[], &jump, 1.0 / 60.0);
        actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);
        let step = actor.update(&mut registry, &[], &jump, 1.0 / 60.0);
        assert!(!step.flight_toggled);
        assert_eq!(step.state, LocomotionState::Ghost);

        actor.set_ghost(false);
        assert_eq!(actor.state(), LocomotionState::Airborne);
    }

    #[test]
    fn test_missing_collider_keeps_moving() {
        let mut registry = CollisionRegistry::new();
        let mut actor = CharacterController::new(ColliderId(10), Vec3::new(0.0, 5.0, 0.0), &SimulationConfig::default());

        let step = actor.update(&mut registry, &[], &idle(), 1.0 / 60.0);
        assert_eq!(step.state, LocomotionState::Airborne);
        assert!(step.displacement.y < 0.0);
        assert_eq!(step.push_out, Vec3::zeros());
    }
}
