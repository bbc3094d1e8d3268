//! Physics module for collision detection and response
//!
//! Geometric collider primitives, layer/mask filtering and the collision
//! registry. There is no rigid-body solver; actors are kinematic and resolve
//! their own penetration through the locomotion layer.

pub mod collider;
pub mod collision;
pub mod collision_layers;
pub mod registry;

pub use collider::{Collider, ColliderError, ColliderId};
pub use collision::{
    Aabb,
    BoundingSphere,
    ColliderShape,
    CollisionResponse,
    OrientedBox,
    Ray,
    RayHit,
    WorldSpaceShape,
};
pub use collision_layers::CollisionLayers;
pub use registry::{
    CollisionEvent,
    CollisionEventKind,
    CollisionPair,
    CollisionRegistry,
    PositionCorrection,
};
