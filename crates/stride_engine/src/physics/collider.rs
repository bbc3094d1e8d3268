//! Collider records stored in the collision registry

use std::fmt;

use crate::foundation::math::{self, Transform, Vec3};
use crate::physics::collision::{Aabb, ColliderShape, WorldSpaceShape};
use crate::physics::collision_layers::CollisionLayers;

/// Caller-assigned collider identifier, unique within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reasons a collider is refused at registration time
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ColliderError {
    /// Box with a zero, negative or non-finite dimension
    #[error("collider {id}: box half extents must be finite and positive, got {half_extents:?}")]
    InvalidBox {
        /// Offending collider
        id: ColliderId,
        /// Half extents as given
        half_extents: Vec3,
    },

    /// Sphere with a zero, negative or non-finite radius
    #[error("collider {id}: sphere radius must be finite and positive, got {radius}")]
    InvalidRadius {
        /// Offending collider
        id: ColliderId,
        /// Radius as given
        radius: f32,
    },

    /// Layer with zero or several bits set
    #[error("collider {id}: layer must be exactly one bit, got {bits:#034b}")]
    InvalidLayer {
        /// Offending collider
        id: ColliderId,
        /// Raw layer bits
        bits: u32,
    },

    /// NaN or infinite position, rotation or offset
    #[error("collider {id}: transform or offset is not finite")]
    NonFiniteTransform {
        /// Offending collider
        id: ColliderId,
    },
}

/// A collision shape bound to an owner's transform
///
/// The owner (actor, level object) keeps the authoritative transform and
/// pushes it into the registry with `set_transform` whenever it moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Unique identifier
    pub id: ColliderId,

    /// Shape in the owner's local frame
    pub shape: ColliderShape,

    /// Shape center relative to the owner's origin
    pub offset: Vec3,

    /// Layer this collider is on (single bit)
    pub layer: CollisionLayers,

    /// Layers this collider interacts with
    pub mask: CollisionLayers,

    /// Last transform synchronised from the owner
    pub transform: Transform,

    /// Static colliders never move and are never corrected
    pub is_static: bool,

    /// Sensors report overlap but never take part in push-out
    pub is_sensor: bool,

    /// Overlap is reported but the registry leaves correction to the owner
    pub manual_resolution: bool,

    /// Disabled colliders are skipped by every query
    pub enabled: bool,
}

impl Collider {
    /// Create a collider on the environment layer that interacts with everything
    pub fn new(id: ColliderId, shape: ColliderShape) -> Self {
        Self {
            id,
            shape,
            offset: Vec3::zeros(),
            layer: CollisionLayers::ENVIRONMENT,
            mask: CollisionLayers::all(),
            transform: Transform::identity(),
            is_static: false,
            is_sensor: false,
            manual_resolution: false,
            enabled: true,
        }
    }

    /// Static level geometry on the environment layer
    pub fn static_geometry(id: ColliderId, shape: ColliderShape, transform: Transform) -> Self {
        Self::new(id, shape).with_transform(transform).as_static()
    }

    /// Set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Set the initial transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Offset the shape center from the owner's origin
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Mark as static geometry
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as a sensor (trigger volume)
    pub fn as_sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    /// Leave penetration correction to the owner
    pub fn with_manual_resolution(mut self) -> Self {
        self.manual_resolution = true;
        self
    }

    /// World-space shape at the current transform
    pub fn world_shape(&self) -> WorldSpaceShape {
        self.shape.to_world_space(&self.transform, self.offset)
    }

    /// World-space bounds at the current transform
    pub fn aabb(&self) -> Aabb {
        self.world_shape().aabb()
    }

    /// Whether the registry may move this collider to resolve overlap
    pub fn is_auto_resolved(&self) -> bool {
        !self.is_static && !self.is_sensor && !self.manual_resolution
    }

    /// Check the configuration invariants enforced at registration
    pub fn validate(&self) -> Result<(), ColliderError> {
        if !self.shape.is_valid() {
            return Err(match self.shape {
                ColliderShape::Box { half_extents, .. } => ColliderError::InvalidBox {
                    id: self.id,
                    half_extents,
                },
                ColliderShape::Sphere { radius } => ColliderError::InvalidRadius { id: self.id, radius },
            });
        }

        if !self.layer.is_single_layer() {
            return Err(ColliderError::InvalidLayer {
                id: self.id,
                bits: self.layer.bits(),
            });
        }

        if !self.transform.is_finite() || !math::is_finite_vec(&self.offset) {
            return Err(ColliderError::NonFiniteTransform { id: self.id });
        }

        Ok(())
    }
}
