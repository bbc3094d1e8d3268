//! Ladder volumes
//!
//! Ladders are advisory regions, not colliders. An actor whose chest point
//! enters one (after growing it by a margin) starts climbing.

use crate::foundation::math::Vec3;
use crate::physics::collision::Aabb;

/// Axis-aligned climbable region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderVolume {
    /// World-space bounds
    pub bounds: Aabb,
}

impl LadderVolume {
    /// Create a ladder centered at `center` with the given full size
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self::from_aabb(Aabb::from_center_half_extents(center, size * 0.5))
    }

    /// Create a ladder from existing bounds
    pub fn from_aabb(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// Whether `point` lies inside the volume grown by `margin`
    pub fn contains(&self, point: Vec3, margin: f32) -> bool {
        self.bounds.expanded(margin).contains_point(point)
    }

    /// Whether any ladder contains `point`
    pub fn any_contains(ladders: &[LadderVolume], point: Vec3, margin: f32) -> bool {
        ladders.iter().any(|ladder| ladder.contains(point, margin))
    }
}
