//! Collision and locomotion debug visualization
//!
//! Turns registry contents, contact state, ladder volumes and ground probe
//! rays into [`DebugShape`]s. Nothing in the simulation reads these back.

use crate::debug::draw::{DebugDrawSystem, DebugShape};
use crate::foundation::math::{self, Vec3, Vec4};
use crate::locomotion::{CharacterController, GroundHit, GroundProbe, LadderVolume, LocomotionState};
use crate::physics::{Collider, CollisionRegistry, WorldSpaceShape};

/// Length of the drawn ground normal
const NORMAL_LENGTH: f32 = 0.5;

/// Color scheme for collision visualization
#[derive(Clone, Debug)]
pub struct CollisionDebugColors {
    /// Static geometry not in contact
    pub static_shape: Vec4,
    /// Dynamic colliders not in contact
    pub dynamic_shape: Vec4,
    /// Sensor volumes
    pub sensor: Vec4,
    /// Any collider touching another
    pub touching: Vec4,
    /// Probe rays that found ground
    pub probe_hit: Vec4,
    /// Probe rays that found nothing
    pub probe_miss: Vec4,
    /// Ladder volumes
    pub ladder: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            static_shape: Vec4::new(0.6, 0.6, 0.6, 0.3),  // Grey
            dynamic_shape: Vec4::new(0.0, 1.0, 0.0, 0.3), // Green
            sensor: Vec4::new(0.5, 0.8, 1.0, 0.15),       // Light blue
            touching: Vec4::new(1.0, 0.0, 0.0, 0.5),      // Red
            probe_hit: Vec4::new(0.0, 1.0, 0.0, 1.0),
            probe_miss: Vec4::new(0.4, 0.4, 0.4, 1.0),
            ladder: Vec4::new(1.0, 0.85, 0.0, 0.25),      // Amber
        }
    }
}

/// Color for an actor in a given locomotion state
pub fn state_color(state: LocomotionState) -> Vec4 {
    match state {
        LocomotionState::Grounded => Vec4::new(0.2, 0.9, 0.2, 1.0),
        LocomotionState::Airborne => Vec4::new(0.3, 0.5, 1.0, 1.0),
        LocomotionState::Sliding => Vec4::new(1.0, 0.5, 0.0, 1.0),
        LocomotionState::Climbing => Vec4::new(1.0, 0.85, 0.0, 1.0),
        LocomotionState::Flying => Vec4::new(0.8, 0.3, 1.0, 1.0),
        LocomotionState::Ghost => Vec4::new(1.0, 1.0, 1.0, 0.3),
    }
}

/// Collision-specific debug visualizer
pub struct CollisionDebugVisualizer {
    debug_draw: DebugDrawSystem,
    colors: CollisionDebugColors,

    /// Draw every registered collider
    pub show_colliders: bool,

    /// Draw ground probe rays and normals
    pub show_probes: bool,

    /// Draw ladder volumes
    pub show_ladders: bool,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            debug_draw: DebugDrawSystem::new(),
            colors: CollisionDebugColors::default(),
            show_colliders: true,
            show_probes: true,
            show_ladders: true,
        }
    }

    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }

    /// Draw every enabled collider for one frame
    ///
    /// Colliders touching anything at the last tick use the touching color.
    pub fn draw_registry(&mut self, registry: &CollisionRegistry) {
        if !self.show_colliders {
            return;
        }

        let touching = registry.touching_pairs();
        for collider in registry.iter().filter(|collider| collider.enabled) {
            let in_contact = touching.iter().any(|pair| pair.contains(collider.id));
            let color = if in_contact {
                self.colors.touching
            } else {
                self.collider_color(collider)
            };
            self.debug_draw.draw(shape_for(&collider.world_shape(), color));
        }
    }

    /// Draw an actor's collision sphere in its state color
    pub fn draw_actor(&mut self, actor: &CharacterController, registry: &CollisionRegistry) {
        if let Some(collider) = registry.get(actor.collider()) {
            self.debug_draw
                .draw(shape_for(&collider.world_shape(), state_color(actor.state())));
        }
    }

    /// Draw the probe's sample rays and the accepted ground normal
    pub fn draw_ground_probe(&mut self, probe: &GroundProbe, feet: Vec3, ground: &GroundHit) {
        if !self.show_probes {
            return;
        }

        let color = if ground.is_grounded {
            self.colors.probe_hit
        } else {
            self.colors.probe_miss
        };
        let length = probe.ray_length();
        for origin in probe.sample_origins(feet) {
            self.debug_draw
                .draw_line(origin, origin + math::down() * length, color, 0.0);
        }

        if ground.is_grounded {
            let base = Vec3::new(feet.x, ground.ground_height, feet.z);
            self.debug_draw
                .draw_line(base, base + ground.normal * NORMAL_LENGTH, self.colors.probe_hit, 0.0);
        }
    }

    /// Keep ladder volumes on screen until cleared
    pub fn draw_ladders(&mut self, ladders: &[LadderVolume]) {
        if !self.show_ladders {
            return;
        }

        for (index, ladder) in ladders.iter().enumerate() {
            self.debug_draw.draw_persistent(
                format!("ladder_{index}"),
                DebugShape::Box {
                    center: ladder.bounds.center(),
                    half_extents: ladder.bounds.half_extents(),
                    rotation: math::Quat::identity(),
                    color: self.colors.ladder,
                    duration: f32::INFINITY,
                },
            );
        }
    }

    /// Clear all visualization
    pub fn clear(&mut self) {
        self.debug_draw.clear();
    }

    /// Update debug system (expire temporary shapes)
    pub fn update(&mut self, delta_time: f32) {
        self.debug_draw.update(delta_time);
    }

    /// Get all debug shapes for rendering
    pub fn shapes(&self) -> Vec<&DebugShape> {
        self.debug_draw.shapes()
    }

    /// Enable/disable the entire debug system
    pub fn set_enabled(&mut self, enabled: bool) {
        self.debug_draw.enabled = enabled;
    }

    /// Check if debug system is enabled
    pub fn is_enabled(&self) -> bool {
        self.debug_draw.enabled
    }

    fn collider_color(&self, collider: &Collider) -> Vec4 {
        if collider.is_sensor {
            self.colors.sensor
        } else if collider.is_static {
            self.colors.static_shape
        } else {
            self.colors.dynamic_shape
        }
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-frame debug shape for a world-space collider shape
fn shape_for(shape: &WorldSpaceShape, color: Vec4) -> DebugShape {
    match shape {
        WorldSpaceShape::Box(obb) => DebugShape::Box {
            center: obb.center,
            half_extents: obb.half_extents,
            rotation: obb.rotation,
            color,
            duration: 0.0,
        },
        WorldSpaceShape::Sphere(sphere) => DebugShape::Sphere {
            center: sphere.center,
            radius: sphere.radius,
            color,
            duration: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroundProbeConfig;
    use crate::foundation::math::Transform;
    use crate::physics::{ColliderId, ColliderShape, CollisionLayers};

    fn overlapping_registry() -> CollisionRegistry {
        let mut registry = CollisionRegistry::new();
        registry
            .add(Collider::static_geometry(
                ColliderId(1),
                ColliderShape::cuboid(Vec3::new(2.0, 2.0, 2.0)),
                Transform::identity(),
            ))
            .unwrap();
        registry
            .add(
                Collider::new(ColliderId(2), ColliderShape::sphere(1.0))
                    .with_layers(CollisionLayers::PLAYER, CollisionLayers::all())
                    .with_transform(Transform::from_position(Vec3::new(1.5, 0.0, 0.0)))
                    .with_manual_resolution(),
            )
            .unwrap();
        registry
            .add(
                Collider::new(ColliderId(3), ColliderShape::sphere(1.0))
                    .with_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
                    .as_static(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_touching_colliders_use_contact_color() {
        let mut registry = overlapping_registry();
        registry.tick();

        let mut viz = CollisionDebugVisualizer::new();
        viz.draw_registry(&registry);

        let colors = CollisionDebugColors::default();
        let shapes = viz.shapes();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes.iter().filter(|shape| shape.color() == colors.touching).count(), 2);
        assert_eq!(shapes[2].color(), colors.static_shape);

        // One-frame shapes are gone after the next update
        viz.update(0.1);
        assert!(viz.shapes().is_empty());
    }

    #[test]
    fn test_probe_draws_one_line_per_ray() {
        let probe = GroundProbe::new(GroundProbeConfig::default());
        let ground = GroundHit {
            is_grounded: true,
            ground_height: 0.0,
            normal: math::up(),
            collider: Some(ColliderId(1)),
            slope_angle: 0.0,
        };

        let mut viz = CollisionDebugVisualizer::new();
        viz.draw_ground_probe(&probe, Vec3::zeros(), &ground);
        assert_eq!(viz.shapes().len(), 6);

        viz.clear();
        viz.draw_ground_probe(&probe, Vec3::zeros(), &GroundHit::none());
        assert_eq!(viz.shapes().len(), 5);
    }

    #[test]
    fn test_custom_colors_and_disable() {
        let mut registry = overlapping_registry();
        registry.tick();
        let colors = CollisionDebugColors {
            touching: Vec4::new(1.0, 0.0, 1.0, 1.0),
            ..CollisionDebugColors::default()
        };

        let mut viz = CollisionDebugVisualizer::new().with_colors(colors.clone());
        viz.draw_registry(&registry);
        assert_eq!(viz.shapes()[0].color(), colors.touching);

        viz.set_enabled(false);
        assert!(!viz.is_enabled());
        assert!(viz.shapes().is_empty());
    }

    #[test]
    fn test_ladders_persist() {
        let mut viz = CollisionDebugVisualizer::new();
        viz.draw_ladders(&[LadderVolume::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 4.0, 0.2))]);

        viz.update(10.0);
        assert_eq!(viz.shapes().len(), 1);
    }
}
