//! Collision registry
//!
//! Keyed store of colliders with layer/mask filtered pair detection,
//! enter/stay/exit bookkeeping and the spatial queries the locomotion layer
//! is built on.
//!
//! There is no broad phase: every query is linear in the number of
//! colliders, and pair detection walks every unordered pair once. Anything
//! observable (events, query results) comes out in ascending id order so a
//! run is reproducible regardless of hash map layout.

use std::collections::{HashMap, HashSet};

use crate::foundation::math::{self, Transform, Vec3};
use crate::physics::collider::{Collider, ColliderError, ColliderId};
use crate::physics::collision::{BoundingSphere, CollisionResponse, Ray, RayHit, WorldSpaceShape};
use crate::physics::collision_layers::CollisionLayers;

/// Two colliders in contact (always stores the smaller id first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller id
    pub a: ColliderId,
    /// Larger id
    pub b: ColliderId,
}

impl CollisionPair {
    /// Create a new collision pair in canonical order
    pub fn new(first: ColliderId, second: ColliderId) -> Self {
        if first < second {
            Self { a: first, b: second }
        } else {
            Self { a: second, b: first }
        }
    }

    /// Whether `id` is one side of this pair
    pub fn contains(&self, id: ColliderId) -> bool {
        self.a == id || self.b == id
    }
}

/// Contact transition reported by [`CollisionRegistry::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// First tick the pair overlaps
    Enter,
    /// Pair still overlaps
    Stay,
    /// First tick the pair no longer overlaps
    Exit,
}

/// A contact notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Transition this event reports
    pub kind: CollisionEventKind,
    /// Smaller id of the pair
    pub a: ColliderId,
    /// Larger id of the pair
    pub b: ColliderId,
    /// Contact seen from `a`; `None` for exits
    pub response: Option<CollisionResponse>,
}

impl CollisionEvent {
    /// The pair this event is about
    pub fn pair(&self) -> CollisionPair {
        CollisionPair { a: self.a, b: self.b }
    }

    /// Whether `id` is one side of this event
    pub fn involves(&self, id: ColliderId) -> bool {
        self.a == id || self.b == id
    }
}

/// Penetration correction applied to a dynamic collider during `tick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionCorrection {
    /// Corrected collider
    pub id: ColliderId,
    /// Translation added to the stored transform
    pub offset: Vec3,
}

/// Store of every collider in one world
///
/// Colliders are added and removed between ticks only, which `&mut self`
/// enforces. Several registries can coexist; nothing here is global.
#[derive(Debug, Default)]
pub struct CollisionRegistry {
    /// Collider data keyed by id
    colliders: HashMap<ColliderId, Collider>,

    /// Pairs touching as of the last tick
    current_pairs: HashSet<CollisionPair>,

    /// Pairs touching as of the tick before
    previous_pairs: HashSet<CollisionPair>,

    /// Corrections applied since the owners last drained them
    corrections: Vec<PositionCorrection>,
}

impl CollisionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider
    ///
    /// Re-adding an existing id replaces the stored collider and returns the
    /// previous one. Contact state for that id is kept, so a replacement that
    /// still overlaps reports `Stay` rather than `Enter`.
    pub fn add(&mut self, collider: Collider) -> Result<Option<Collider>, ColliderError> {
        if let Err(error) = collider.validate() {
            log::warn!("Rejected collider: {}", error);
            return Err(error);
        }

        let id = collider.id;
        let previous = self.colliders.insert(id, collider);
        if previous.is_some() {
            log::debug!("Replaced collider {}", id);
        } else {
            log::debug!("Added collider {} ({} total)", id, self.colliders.len());
        }
        Ok(previous)
    }

    /// Unregister a collider
    ///
    /// Unknown ids are ignored. Contacts involving the removed collider are
    /// reported as `Exit` on the next tick.
    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        let removed = self.colliders.remove(&id);
        if removed.is_some() {
            log::debug!("Removed collider {}", id);
        }
        removed
    }

    /// Look up a collider
    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Mutable access to a collider
    ///
    /// Changes made here bypass validation; prefer [`Self::set_transform`]
    /// for moving colliders.
    pub fn get_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(&id)
    }

    /// Check if a collider is registered
    pub fn contains(&self, id: ColliderId) -> bool {
        self.colliders.contains_key(&id)
    }

    /// Synchronise a collider with its owner's transform
    ///
    /// Returns `false` when the id is unknown or the transform is not finite;
    /// the stored transform is left untouched in both cases.
    pub fn set_transform(&mut self, id: ColliderId, transform: Transform) -> bool {
        if !transform.is_finite() {
            log::warn!("Ignored non-finite transform for collider {}", id);
            return false;
        }
        match self.colliders.get_mut(&id) {
            Some(collider) => {
                collider.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Enable or disable a collider; returns `false` for unknown ids
    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) -> bool {
        match self.colliders.get_mut(&id) {
            Some(collider) => {
                collider.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Clear all collision data
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.current_pairs.clear();
        self.previous_pairs.clear();
        self.corrections.clear();
    }

    /// Colliders in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Collider> + '_ {
        let mut colliders: Vec<&Collider> = self.colliders.values().collect();
        colliders.sort_by_key(|collider| collider.id);
        colliders.into_iter()
    }

    /// Pairs touching as of the last tick, in ascending order
    pub fn touching_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs: Vec<CollisionPair> = self.current_pairs.iter().copied().collect();
        pairs.sort();
        pairs
    }

    /// Whether two colliders were touching at the last tick
    pub fn is_touching(&self, a: ColliderId, b: ColliderId) -> bool {
        self.current_pairs.contains(&CollisionPair::new(a, b))
    }

    /// Run pair detection and return this tick's contact events
    ///
    /// Static-static pairs are skipped since they can only change through
    /// add/remove. Overlapping non-sensor pairs are separated along their
    /// response: a dynamic side that is not under manual resolution takes the
    /// full overlap against a static or manual partner, and each takes half
    /// when both sides are auto-resolved.
    pub fn tick(&mut self) -> Vec<CollisionEvent> {
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();

        let ids = self.sorted_ids();
        let mut events = Vec::new();

        for (index, &id_a) in ids.iter().enumerate() {
            for &id_b in &ids[index + 1..] {
                let Some(response) = self.pair_response(id_a, id_b) else {
                    continue;
                };

                let pair = CollisionPair::new(id_a, id_b);
                let kind = if self.previous_pairs.contains(&pair) {
                    CollisionEventKind::Stay
                } else {
                    CollisionEventKind::Enter
                };
                self.current_pairs.insert(pair);
                events.push(CollisionEvent {
                    kind,
                    a: id_a,
                    b: id_b,
                    response: Some(response),
                });

                self.separate(id_a, id_b, &response);
            }
        }

        let mut exited: Vec<CollisionPair> = self
            .previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect();
        exited.sort();
        events.extend(exited.into_iter().map(|pair| CollisionEvent {
            kind: CollisionEventKind::Exit,
            a: pair.a,
            b: pair.b,
            response: None,
        }));

        events.sort_by_key(|event| event.pair());
        events
    }

    /// Take the corrections applied by `tick` since the last call
    pub fn drain_corrections(&mut self) -> Vec<PositionCorrection> {
        std::mem::take(&mut self.corrections)
    }

    /// Colliders on `mask` within `radius` of `point`, in ascending id order
    ///
    /// A non-positive radius tests plain point containment.
    pub fn overlap_at(&self, point: Vec3, radius: f32, mask: CollisionLayers) -> Vec<ColliderId> {
        if mask.is_empty() || !math::is_finite_vec(&point) || !radius.is_finite() {
            return Vec::new();
        }

        let probe = BoundingSphere::new(point, radius);
        self.iter()
            .filter(|collider| collider.enabled && mask.intersects(collider.layer))
            .filter(|collider| {
                let shape = collider.world_shape();
                if radius > 0.0 {
                    shape.overlaps_sphere(&probe)
                } else {
                    shape.contains_point(point)
                }
            })
            .map(|collider| collider.id)
            .collect()
    }

    /// Cast a ray against every enabled collider on `mask`
    ///
    /// Hits are sorted by ascending distance (ties by id). `exclude` is the
    /// caster's own collider. A zero or non-finite direction, or a
    /// non-positive length, yields no hits.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: CollisionLayers,
        exclude: Option<ColliderId>,
    ) -> Vec<RayHit> {
        if mask.is_empty() || max_distance.is_nan() || max_distance <= 0.0 {
            return Vec::new();
        }
        let Some(ray) = Ray::new(origin, direction) else {
            return Vec::new();
        };

        let mut hits: Vec<RayHit> = self
            .iter()
            .filter(|collider| collider.enabled && mask.intersects(collider.layer))
            .filter(|collider| Some(collider.id) != exclude)
            .filter_map(|collider| {
                let (distance, point, normal) = collider.world_shape().intersect_ray(&ray)?;
                (distance <= max_distance).then_some(RayHit {
                    collider: collider.id,
                    distance,
                    point,
                    normal,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.collider.cmp(&b.collider))
        });
        hits
    }

    /// Every enabled collider on `mask` that `id` currently overlaps
    ///
    /// Responses are oriented toward `id`. Unknown or disabled ids yield
    /// nothing.
    pub fn overlapping(&self, id: ColliderId, mask: CollisionLayers) -> Vec<(ColliderId, CollisionResponse)> {
        let Some(queried) = self.colliders.get(&id).filter(|collider| collider.enabled) else {
            return Vec::new();
        };
        if mask.is_empty() {
            return Vec::new();
        }

        let shape = queried.world_shape();
        self.iter()
            .filter(|other| other.id != id && other.enabled && mask.intersects(other.layer))
            .filter_map(|other| shape.response_to(&other.world_shape()).map(|response| (other.id, response)))
            .collect()
    }

    /// Current response of `id` against `other`, oriented toward `id`
    pub fn response_between(&self, id: ColliderId, other: ColliderId) -> Option<CollisionResponse> {
        let queried = self.colliders.get(&id)?;
        let other = self.colliders.get(&other)?;
        if !queried.enabled || !other.enabled {
            return None;
        }
        queried.world_shape().response_to(&other.world_shape())
    }

    /// World shape of a registered collider
    pub fn world_shape(&self, id: ColliderId) -> Option<WorldSpaceShape> {
        self.colliders.get(&id).map(Collider::world_shape)
    }

    fn sorted_ids(&self) -> Vec<ColliderId> {
        let mut ids: Vec<ColliderId> = self.colliders.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Narrow phase for one candidate pair, `None` when filtered or apart
    fn pair_response(&self, id_a: ColliderId, id_b: ColliderId) -> Option<CollisionResponse> {
        let a = self.colliders.get(&id_a)?;
        let b = self.colliders.get(&id_b)?;

        if !a.enabled || !b.enabled || (a.is_static && b.is_static) {
            return None;
        }
        if !CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask) {
            return None;
        }

        a.world_shape().response_to(&b.world_shape())
    }

    /// Push an overlapping pair apart; `response` is oriented toward `id_a`
    fn separate(&mut self, id_a: ColliderId, id_b: ColliderId, response: &CollisionResponse) {
        let (Some(a), Some(b)) = (self.colliders.get(&id_a), self.colliders.get(&id_b)) else {
            return;
        };
        if a.is_sensor || b.is_sensor {
            return;
        }

        let (share_a, share_b) = match (a.is_auto_resolved(), b.is_auto_resolved()) {
            (true, true) => (0.5, 0.5),
            (true, false) => (1.0, 0.0),
            (false, true) => (0.0, 1.0),
            (false, false) => return,
        };

        let push = response.push_out();
        self.apply_correction(id_a, push * share_a);
        self.apply_correction(id_b, -push * share_b);
    }

    fn apply_correction(&mut self, id: ColliderId, offset: Vec3) {
        if offset == Vec3::zeros() {
            return;
        }
        if let Some(collider) = self.colliders.get_mut(&id) {
            collider.transform.position += offset;
            log::trace!("Corrected collider {} by {:?}", id, offset);
            self.corrections.push(PositionCorrection { id, offset });
        }
    }
}
