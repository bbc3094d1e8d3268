//! Built-in test level
//!
//! A flat floor with a gentle ramp and a steep ramp side by side, a wall,
//! a ladder against a tower, and a jump pad.

use stride_engine::foundation::math::utils::deg_to_rad;
use stride_engine::physics::{Collider, ColliderError, ColliderId, ColliderShape, CollisionLayers};
use stride_engine::prelude::{LadderVolume, Quat, Simulation, Transform, Vec3};

/// Trigger that launches any character entering it
#[derive(Debug, Clone, Copy)]
pub struct JumpPad {
    /// Sensor collider
    pub id: ColliderId,
    /// Impulse handed to the actor on entry
    pub impulse: Vec3,
}

/// Handles the driver needs after the level is loaded
#[derive(Debug, Default)]
pub struct Level {
    /// Jump pads by sensor id
    pub jump_pads: Vec<JumpPad>,
}

impl Level {
    /// The pad owning `id`, if any
    pub fn jump_pad(&self, id: ColliderId) -> Option<&JumpPad> {
        self.jump_pads.iter().find(|pad| pad.id == id)
    }
}

/// Where the player starts
pub fn spawn_point() -> Vec3 {
    Vec3::new(0.0, 0.5, 0.0)
}

/// Register the level's colliders and ladders
pub fn build(simulation: &mut Simulation) -> Result<Level, ColliderError> {
    simulation.add_collider(Collider::static_geometry(
        ColliderId(1),
        ColliderShape::cuboid(Vec3::new(60.0, 1.0, 60.0)),
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
    ))?;

    simulation.add_collider(ramp(ColliderId(2), Vec3::new(5.0, 0.0, 0.0), 30.0, 6.0))?;
    simulation.add_collider(ramp(ColliderId(3), Vec3::new(5.0, 0.0, 6.0), 60.0, 4.0))?;

    simulation.add_collider(Collider::static_geometry(
        ColliderId(4),
        ColliderShape::cuboid(Vec3::new(1.0, 3.0, 10.0)),
        Transform::from_position(Vec3::new(-6.0, 1.5, 0.0)),
    ))?;

    // Tower with a ladder on its +Z face
    simulation.add_collider(Collider::static_geometry(
        ColliderId(5),
        ColliderShape::cuboid(Vec3::new(2.0, 6.0, 1.0)),
        Transform::from_position(Vec3::new(0.0, 3.0, -7.0)),
    ))?;
    simulation.add_ladder(LadderVolume::new(Vec3::new(0.0, 3.0, -6.0), Vec3::new(1.0, 6.0, 0.2)));

    let pad = JumpPad {
        id: ColliderId(6),
        impulse: Vec3::new(0.0, 12.0, 3.0),
    };
    simulation.add_collider(
        Collider::new(pad.id, ColliderShape::cuboid(Vec3::new(2.0, 0.5, 2.0)))
            .with_layers(CollisionLayers::TRIGGER, CollisionLayers::CHARACTERS)
            .with_transform(Transform::from_position(Vec3::new(-3.0, 0.25, 4.0)))
            .as_static()
            .as_sensor(),
    )?;

    log::info!(
        "Level loaded: {} colliders, {} ladders",
        simulation.registry().len(),
        simulation.ladders().len()
    );
    Ok(Level { jump_pads: vec![pad] })
}

/// Ramp rising toward +X whose low edge lies on the floor at `foot`
fn ramp(id: ColliderId, foot: Vec3, degrees: f32, length: f32) -> Collider {
    let rotation = Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(degrees));
    let center = foot + rotation * Vec3::new(length * 0.5, -0.5, 0.0);
    Collider::static_geometry(
        id,
        ColliderShape::cuboid(Vec3::new(length, 1.0, 4.0)),
        Transform::from_position_rotation(center, rotation),
    )
}
