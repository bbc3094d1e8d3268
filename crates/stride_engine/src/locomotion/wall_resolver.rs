//! Post-move wall push-out
//!
//! After an actor moves, its collider is tested against world geometry and
//! pushed out of anything that behaves like a wall. Floors and ceilings
//! (normals close to vertical) are left to the ground probe.
//!
//! This is a single pass over the overlaps in ascending id order, each one
//! re-evaluated at the position left by the previous push. A deep concave
//! corner can keep some residual penetration until the next tick.

use crate::config::WallResolverConfig;
use crate::foundation::math::{Transform, Vec3};
use crate::physics::{ColliderId, CollisionLayers, CollisionRegistry};

/// Pushes an actor's collider out of walls
#[derive(Debug, Clone)]
pub struct WallResolver {
    config: WallResolverConfig,
    mask: CollisionLayers,
}

impl WallResolver {
    /// Create a resolver against world geometry
    pub fn new(config: WallResolverConfig) -> Self {
        Self {
            config,
            mask: CollisionLayers::WORLD,
        }
    }

    /// Resolve against a different set of layers
    pub fn with_mask(mut self, mask: CollisionLayers) -> Self {
        self.mask = mask;
        self
    }

    /// Push `actor` out of overlapping walls and return the total correction
    ///
    /// The collider's stored transform is updated as it goes; the caller
    /// applies the returned offset to its own position. A collider missing
    /// from the registry is skipped with a warning and yields no correction.
    pub fn resolve(&self, registry: &mut CollisionRegistry, actor: ColliderId) -> Vec3 {
        let Some(mut transform) = registry.get(actor).map(|collider| collider.transform) else {
            log::warn!("Wall resolver: collider {} is not registered, skipping", actor);
            return Vec3::zeros();
        };

        let candidates = registry.overlapping(actor, self.mask);
        let mut total = Vec3::zeros();

        for (other, _) in candidates {
            if registry.get(other).is_some_and(|collider| collider.is_sensor) {
                continue;
            }
            // Earlier pushes may already have cleared this contact
            let Some(response) = registry.response_between(actor, other) else {
                continue;
            };
            if response.normal.y.abs() >= self.config.max_vertical_normal {
                continue;
            }

            let push = response.push_out();
            total += push;
            transform = Transform::from_position_rotation(transform.position + push, transform.rotation);
            registry.set_transform(actor, transform);
            log::trace!("Pushed collider {} out of {} by {:?}", actor, other, push);
        }

        total
    }
}
