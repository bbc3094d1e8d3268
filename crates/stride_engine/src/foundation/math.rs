//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision and locomotion code.
//! The world is Y-up and right-handed.

pub use nalgebra::{Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (debug colors)
pub type Vec4 = Vector4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Squared length below which a vector is treated as zero.
pub const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

/// World up axis
pub fn up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// World down axis
pub fn down() -> Vec3 {
    Vec3::new(0.0, -1.0, 0.0)
}

/// Rigid transform: position and rotation, always unit scale.
///
/// Collision shapes are stored in local space and moved into the world with
/// this transform on demand, so bounds never go stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Move a local-space point into world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        is_finite_vec(&self.position)
            && self.rotation.coords.iter().all(|c| c.is_finite())
    }
}

/// True when every component of `v` is finite
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Normalize `v`, or return `fallback` when `v` is (nearly) zero.
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length_sq = v.magnitude_squared();
    if length_sq > DEGENERATE_LENGTH_SQ && length_sq.is_finite() {
        v / length_sq.sqrt()
    } else {
        fallback
    }
}

/// Drop the vertical component of `v`
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Angle in radians between two vectors, 0 when either is degenerate
pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
    let denom = (a.magnitude_squared() * b.magnitude_squared()).sqrt();
    if denom <= DEGENERATE_LENGTH_SQ {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Angle conversions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_transform_point_rotates_then_translates() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), utils::deg_to_rad(90.0));
        let transform = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), rotation);

        assert_relative_eq!(transform.transform_point(Vec3::x()), Vec3::new(1.0, 3.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_normalize_or_falls_back_on_zero() {
        assert_eq!(normalize_or(Vec3::zeros(), up()), up());
        assert_relative_eq!(normalize_or(Vec3::new(3.0, 0.0, 4.0), up()).magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_angle_between() {
        let tilted = Vec3::new(1.0, 1.0, 0.0);
        assert_relative_eq!(angle_between(&tilted, &up()), utils::deg_to_rad(45.0), epsilon = EPSILON);
        assert_eq!(angle_between(&Vec3::zeros(), &up()), 0.0);
    }

    #[test]
    fn test_non_finite_transform_detected() {
        let transform = Transform::from_position(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(!transform.is_finite());
        assert!(Transform::identity().is_finite());
    }
}
