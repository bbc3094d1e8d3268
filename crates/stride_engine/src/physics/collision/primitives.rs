//! Primitive collision shapes and intersection algorithms
//!
//! Provides basic geometric primitives (rays, spheres, boxes) with
//! intersection tests. Everything here is world space and stateless.

use crate::foundation::math::{self, Quat, Vec3};
use crate::physics::collider::ColliderId;

/// Below this a ray direction component is treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1.0e-8;

/// A ray for ray casting and ground probing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// Returns `None` when the direction is zero or not finite.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !math::is_finite_vec(&origin) || !math::is_finite_vec(&direction) {
            return None;
        }
        let length_sq = direction.magnitude_squared();
        if length_sq <= math::DEGENERATE_LENGTH_SQ {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / length_sq.sqrt(),
        })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray cast against the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The collider that was hit
    pub collider: ColliderId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.inf(&max),
            max: min.sup(&max),
        }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half extents of the AABB
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        let grow = Vec3::repeat(margin);
        Self::new(self.min - grow, self.max + grow)
    }

    /// Check if this AABB contains a point (boundary inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Per-axis overlap with another box (negative on separated axes)
    pub fn overlap_extents(&self, other: &Aabb) -> Vec3 {
        self.max.inf(&other.max) - self.min.sup(&other.min)
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Axis-aligned bounds of the sphere
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec3::repeat(self.radius))
    }

    /// Check if the sphere contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }

    /// Test ray intersection with this sphere
    ///
    /// Returns (distance, hit_point, normal) for the entry point, or `None`
    /// when the ray misses or starts inside the sphere.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        // Solve |origin + t*direction - center|^2 = radius^2 with a unit direction
        let oc = ray.origin - self.center;
        let b = oc.dot(&ray.direction);
        let c = oc.magnitude_squared() - self.radius * self.radius;

        if c < 0.0 {
            return None; // Origin inside the sphere
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let t = -b - discriminant.sqrt();
        if t < 0.0 {
            return None; // Sphere behind the ray
        }

        let hit_point = ray.point_at(t);
        let normal = math::normalize_or(hit_point - self.center, math::up());
        Some((t, hit_point, normal))
    }
}

/// An oriented box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Center of the box in world space
    pub center: Vec3,
    /// Half size along each local axis
    pub half_extents: Vec3,
    /// World orientation of the box
    pub rotation: Quat,
}

impl OrientedBox {
    /// Creates a new oriented box
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// World-space point to box-local space (unit scale)
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.center)
    }

    /// Axis-aligned bounds enclosing the rotated box
    pub fn aabb(&self) -> Aabb {
        let rotation = self.rotation.to_rotation_matrix();
        let half = rotation.matrix().abs() * self.half_extents;
        Aabb::from_center_half_extents(self.center, half)
    }

    /// Closest point on (or in) the box, in box-local space
    pub fn closest_local_point(&self, local: Vec3) -> Vec3 {
        local.sup(&-self.half_extents).inf(&self.half_extents)
    }

    /// Check if the box contains a world-space point
    pub fn contains_point(&self, point: Vec3) -> bool {
        let local = self.to_local(point);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }

    /// Slab-method ray test in box-local space
    ///
    /// Returns (distance, hit_point, world_normal) of the entry face, or
    /// `None` when the ray misses or starts inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        let origin = self.to_local(ray.origin);
        let direction = self.rotation.inverse() * ray.direction;

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_normal = Vec3::zeros();

        for axis in 0..3 {
            let half = self.half_extents[axis];
            if direction[axis].abs() < PARALLEL_EPSILON {
                if origin[axis] < -half || origin[axis] > half {
                    return None; // Parallel and outside this slab
                }
                continue;
            }

            let inv = 1.0 / direction[axis];
            let mut t_near = (-half - origin[axis]) * inv;
            let mut t_far = (half - origin[axis]) * inv;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            if t_near > t_enter {
                t_enter = t_near;
                enter_normal = Vec3::zeros();
                enter_normal[axis] = -direction[axis].signum();
            }
            t_exit = t_exit.min(t_far);

            if t_enter > t_exit {
                return None;
            }
        }

        if t_exit < 0.0 || t_enter < 0.0 {
            return None; // Behind the ray, or the origin is inside
        }

        let normal = math::normalize_or(self.rotation * enter_normal, math::up());
        Some((t_enter, ray.point_at(t_enter), normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils::deg_to_rad;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::zeros(), Vec3::zeros()).is_none());
        assert!(Ray::new(Vec3::zeros(), Vec3::new(f32::NAN, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_sphere_ray_hit_and_inside_origin() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0)).unwrap();

        let (distance, point, normal) = sphere.intersect_ray(&ray).unwrap();
        assert_relative_eq!(distance, 4.0, epsilon = 1e-5);
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, 4.0), epsilon = 1e-5);
        assert_relative_eq!(normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);

        let inside = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(sphere.intersect_ray(&inside).is_none());
    }

    #[test]
    fn test_box_ray_hits_top_face() {
        let floor = OrientedBox::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(5.0, 0.5, 5.0), Quat::identity());
        let ray = Ray::new(Vec3::new(1.0, 2.0, 1.0), Vec3::new(0.0, -1.0, 0.0)).unwrap();

        let (distance, point, normal) = floor.intersect_ray(&ray).unwrap();
        assert_relative_eq!(distance, 2.0, epsilon = 1e-5);
        assert_relative_eq!(point, Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_box_ray_normal_follows_rotation() {
        let angle = deg_to_rad(30.0);
        let ramp = OrientedBox::new(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(5.0, 0.5, 5.0),
            Quat::from_axis_angle(&Vec3::z_axis(), angle),
        );
        let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0)).unwrap();

        let (_, _, normal) = ramp.intersect_ray(&ray).unwrap();
        assert_relative_eq!(normal, Vec3::new(-angle.sin(), angle.cos(), 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_box_ray_misses() {
        let wall = OrientedBox::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0), Quat::identity());
        let parallel = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let behind = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let inside = Ray::new(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0)).unwrap();

        assert!(wall.intersect_ray(&parallel).is_none());
        assert!(wall.intersect_ray(&behind).is_none());
        assert!(wall.intersect_ray(&inside).is_none());
    }

    #[test]
    fn test_rotated_box_aabb_encloses_corners() {
        let obb = OrientedBox::new(
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            Quat::from_axis_angle(&Vec3::y_axis(), deg_to_rad(45.0)),
        );
        let aabb = obb.aabb();
        assert_relative_eq!(aabb.max.x, 2.0_f32.sqrt(), epsilon = 1e-5);
        assert_relative_eq!(aabb.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_aabb_expanded_contains() {
        let aabb = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, -1.0));
        assert!(!aabb.contains_point(Vec3::new(1.2, 0.0, 0.0)));
        assert!(aabb.expanded(0.3).contains_point(Vec3::new(1.2, 0.0, 0.0)));
    }
}
