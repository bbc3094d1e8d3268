//! Collider shapes and narrow-phase response
//!
//! Shapes are stored in local space and transformed to world space
//! on demand during tests, so bounds always follow the owning transform.

use crate::foundation::math::{self, Quat, Transform, Vec3};
use super::primitives::{Aabb, BoundingSphere, OrientedBox, Ray};

/// Below this distance a sphere center is treated as lying on the box.
const ENCLOSED_EPSILON: f32 = 1.0e-6;

/// Collider shape types (stored in LOCAL SPACE)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// A box with half extents and a rotation relative to the owner
    Box {
        /// Half size along each local axis
        half_extents: Vec3,
        /// Rotation relative to the owning transform
        local_rotation: Quat,
    },
    /// A sphere (radius only, position from the owning transform)
    Sphere {
        /// Radius of the sphere
        radius: f32,
    },
}

impl ColliderShape {
    /// Creates an axis-aligned box of the given full size
    pub fn cuboid(size: Vec3) -> Self {
        Self::Box {
            half_extents: size * 0.5,
            local_rotation: Quat::identity(),
        }
    }

    /// Creates a box of the given full size with a local rotation
    pub fn rotated_cuboid(size: Vec3, local_rotation: Quat) -> Self {
        Self::Box {
            half_extents: size * 0.5,
            local_rotation,
        }
    }

    /// Creates a sphere with the given radius
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// True when every dimension is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Box { half_extents, local_rotation } => {
                half_extents.iter().all(|h| h.is_finite() && *h > 0.0)
                    && local_rotation.coords.iter().all(|c| c.is_finite())
            }
            Self::Sphere { radius } => radius.is_finite() && *radius > 0.0,
        }
    }

    /// Transform this shape to world space
    ///
    /// `offset` is the shape center relative to the owner, in the owner's
    /// local frame.
    pub fn to_world_space(&self, transform: &Transform, offset: Vec3) -> WorldSpaceShape {
        let center = transform.transform_point(offset);
        match self {
            Self::Box { half_extents, local_rotation } => WorldSpaceShape::Box(OrientedBox::new(
                center,
                *half_extents,
                transform.rotation * local_rotation,
            )),
            Self::Sphere { radius } => WorldSpaceShape::Sphere(BoundingSphere::new(center, *radius)),
        }
    }
}

/// Penetration response between two shapes
///
/// `normal` always points from the other shape toward the queried one, so
/// moving the queried shape by `normal * overlap` separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResponse {
    /// Unit push-out direction
    pub normal: Vec3,
    /// Penetration depth (always > 0 for a returned response)
    pub overlap: f32,
    /// Same as `normal`
    pub direction: Vec3,
}

impl CollisionResponse {
    /// Build a response, normalizing `normal` and falling back to world up
    pub fn new(normal: Vec3, overlap: f32) -> Self {
        let normal = math::normalize_or(normal, math::up());
        Self {
            normal,
            overlap,
            direction: normal,
        }
    }

    /// The same contact seen from the other shape
    pub fn flipped(&self) -> Self {
        Self::new(-self.normal, self.overlap)
    }

    /// Translation that separates the queried shape
    pub fn push_out(&self) -> Vec3 {
        self.normal * self.overlap
    }
}

/// World-space collision shape (temporary, for testing only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldSpaceShape {
    /// World-space oriented box
    Box(OrientedBox),
    /// World-space sphere
    Sphere(BoundingSphere),
}

impl WorldSpaceShape {
    /// Get center position
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Box(obb) => obb.center,
            Self::Sphere(sphere) => sphere.center,
        }
    }

    /// Axis-aligned bounds for broad-phase use
    pub fn aabb(&self) -> Aabb {
        match self {
            Self::Box(obb) => obb.aabb(),
            Self::Sphere(sphere) => sphere.aabb(),
        }
    }

    /// Check if the shape contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        match self {
            Self::Box(obb) => obb.contains_point(point),
            Self::Sphere(sphere) => sphere.contains_point(point),
        }
    }

    /// Test ray intersection with this collision shape
    /// Returns (distance, hit_point, normal) if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        match self {
            Self::Box(obb) => obb.intersect_ray(ray),
            Self::Sphere(sphere) => sphere.intersect_ray(ray),
        }
    }

    /// Penetration response of `self` against `other`
    ///
    /// Returns `None` when the shapes are separated or only touching.
    pub fn response_to(&self, other: &WorldSpaceShape) -> Option<CollisionResponse> {
        match (self, other) {
            // Boxes use their AABBs only; rotation is kept for rendering
            (Self::Box(a), Self::Box(b)) => aabb_response(&a.aabb(), &b.aabb()),
            (Self::Sphere(sphere), Self::Box(obb)) => sphere_box_response(sphere, obb),
            (Self::Box(obb), Self::Sphere(sphere)) => {
                sphere_box_response(sphere, obb).map(|response| response.flipped())
            }
            (Self::Sphere(a), Self::Sphere(b)) => sphere_sphere_response(a, b),
        }
    }

    /// Check if this shape overlaps a probe sphere
    pub fn overlaps_sphere(&self, probe: &BoundingSphere) -> bool {
        self.response_to(&WorldSpaceShape::Sphere(*probe)).is_some()
    }
}

/// AABB vs AABB along the axis of least penetration
fn aabb_response(queried: &Aabb, other: &Aabb) -> Option<CollisionResponse> {
    let overlap = queried.overlap_extents(other);
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }

    let mut axis = 0;
    for candidate in 1..3 {
        if overlap[candidate] < overlap[axis] {
            axis = candidate;
        }
    }

    let separation = queried.center() - other.center();
    if separation.magnitude_squared() <= math::DEGENERATE_LENGTH_SQ {
        // Identical centers give no direction
        return Some(CollisionResponse::new(math::up(), overlap.y));
    }

    let mut normal = Vec3::zeros();
    normal[axis] = if separation[axis] < 0.0 { -1.0 } else { 1.0 };
    Some(CollisionResponse::new(normal, overlap[axis]))
}

/// Sphere against oriented box; the normal points from the box to the sphere
fn sphere_box_response(sphere: &BoundingSphere, obb: &OrientedBox) -> Option<CollisionResponse> {
    let local_center = obb.to_local(sphere.center);
    let closest = obb.closest_local_point(local_center);
    let delta = local_center - closest;

    let distance_sq = delta.magnitude_squared();
    if distance_sq >= sphere.radius * sphere.radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    if distance <= ENCLOSED_EPSILON {
        // Center inside the box: no closest-point direction exists
        return Some(CollisionResponse::new(math::up(), sphere.radius));
    }

    let normal = obb.rotation * (delta / distance);
    Some(CollisionResponse::new(normal, sphere.radius - distance))
}

fn sphere_sphere_response(queried: &BoundingSphere, other: &BoundingSphere) -> Option<CollisionResponse> {
    let delta = queried.center - other.center;
    let radius_sum = queried.radius + other.radius;
    let distance_sq = delta.magnitude_squared();
    if distance_sq >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    Some(CollisionResponse::new(
        math::normalize_or(delta, math::up()),
        radius_sum - distance,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils::deg_to_rad;
    use approx::assert_relative_eq;

    fn unit_box_at(center: Vec3) -> WorldSpaceShape {
        ColliderShape::cuboid(Vec3::new(2.0, 2.0, 2.0)).to_world_space(&Transform::from_position(center), Vec3::zeros())
    }

    fn sphere_at(center: Vec3, radius: f32) -> WorldSpaceShape {
        ColliderShape::sphere(radius).to_world_space(&Transform::from_position(center), Vec3::zeros())
    }

    #[test]
    fn test_sphere_outside_box_aabb_has_no_response() {
        let wall = unit_box_at(Vec3::zeros());
        let samples = [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, -2.6, 0.0),
            Vec3::new(1.6, 1.6, 1.6),
            Vec3::new(-1.0, 0.5, 2.51),
        ];

        for center in samples {
            let probe = sphere_at(center, 0.5);
            assert!(probe.response_to(&wall).is_none(), "unexpected contact at {center:?}");
            assert!(wall.response_to(&probe).is_none());
        }
    }

    #[test]
    fn test_sphere_center_inside_box_has_unit_normal() {
        let wall = unit_box_at(Vec3::zeros());
        for center in [Vec3::zeros(), Vec3::new(0.3, -0.9, 0.2), Vec3::new(1.0, 1.0, 1.0)] {
            let probe = sphere_at(center, 0.25);
            let response = probe.response_to(&wall).unwrap();

            assert!(response.overlap > 0.0);
            assert_relative_eq!(response.normal.magnitude(), 1.0, epsilon = 1e-5);
            assert!(response.normal.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn test_enclosed_sphere_defaults_to_up() {
        let wall = unit_box_at(Vec3::zeros());
        let response = sphere_at(Vec3::new(0.2, 0.1, 0.0), 0.5).response_to(&wall).unwrap();

        assert_eq!(response.normal, math::up());
        assert_relative_eq!(response.overlap, 0.5);
        assert_eq!(response.direction, response.normal);
    }

    #[test]
    fn test_sphere_against_wall_face() {
        let wall = unit_box_at(Vec3::zeros());
        let probe = sphere_at(Vec3::new(1.3, 0.0, 0.0), 0.5);

        let response = probe.response_to(&wall).unwrap();
        assert_relative_eq!(response.normal, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(response.overlap, 0.2, epsilon = 1e-5);

        // Same contact from the box's point of view
        let reverse = wall.response_to(&probe).unwrap();
        assert_relative_eq!(reverse.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_against_rotated_box_uses_box_orientation() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), deg_to_rad(45.0));
        let ramp = ColliderShape::rotated_cuboid(Vec3::new(2.0, 2.0, 2.0), rotation)
            .to_world_space(&Transform::identity(), Vec3::zeros());
        // Just above the rotated +Y face
        let face_normal = rotation * math::up();
        let probe = sphere_at(face_normal * 1.2, 0.5);

        let response = probe.response_to(&ramp).unwrap();
        assert_relative_eq!(response.normal, face_normal, epsilon = 1e-4);
        assert_relative_eq!(response.overlap, 0.3, epsilon = 1e-4);
    }

    #[test]
    fn test_box_box_uses_least_penetration_axis() {
        let actor = ColliderShape::cuboid(Vec3::new(1.0, 2.0, 1.0))
            .to_world_space(&Transform::from_position(Vec3::new(1.4, 0.0, 0.0)), Vec3::zeros());
        let wall = unit_box_at(Vec3::zeros());

        let response = actor.response_to(&wall).unwrap();
        assert_eq!(response.normal, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(response.overlap, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_touching_boxes_do_not_respond() {
        let a = unit_box_at(Vec3::zeros());
        let b = unit_box_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(a.response_to(&b).is_none());
    }

    #[test]
    fn test_sphere_sphere_coincident_centers() {
        let a = sphere_at(Vec3::zeros(), 1.0);
        let b = sphere_at(Vec3::zeros(), 1.0);
        let response = a.response_to(&b).unwrap();
        assert_eq!(response.normal, math::up());
        assert_relative_eq!(response.overlap, 2.0);
    }

    #[test]
    fn test_shape_validation() {
        assert!(ColliderShape::cuboid(Vec3::new(1.0, 1.0, 1.0)).is_valid());
        assert!(!ColliderShape::cuboid(Vec3::new(1.0, 0.0, 1.0)).is_valid());
        assert!(!ColliderShape::cuboid(Vec3::new(1.0, -2.0, 1.0)).is_valid());
        assert!(!ColliderShape::sphere(0.0).is_valid());
        assert!(!ColliderShape::sphere(f32::INFINITY).is_valid());
    }
}
