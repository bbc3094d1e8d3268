//! Slope classification and projection

use crate::foundation::math::{self, Vec3};

/// Whether a surface can be stood on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlopeClass {
    /// Angle to world up at or below the walkable limit
    Walkable,
    /// Too steep; the actor slides
    TooSteep,
}

/// Angle between a surface normal and world up, in radians
pub fn slope_angle(normal: &Vec3) -> f32 {
    math::angle_between(normal, &math::up())
}

/// Classify a surface normal against the walkable limit (radians)
pub fn classify(normal: &Vec3, max_walk_angle: f32) -> SlopeClass {
    if slope_angle(normal) <= max_walk_angle {
        SlopeClass::Walkable
    } else {
        SlopeClass::TooSteep
    }
}

/// Project `velocity` onto the plane with unit normal `normal`, keeping its speed
///
/// Vectors already in the plane come back unchanged. A velocity along the
/// normal has no in-plane part and projects to zero.
pub fn project_on_plane(velocity: Vec3, normal: &Vec3) -> Vec3 {
    let speed = velocity.magnitude();
    let in_plane = velocity - normal * velocity.dot(normal);
    math::normalize_or(in_plane, Vec3::zeros()) * speed
}

/// Unit downhill direction on the plane, zero on flat ground
pub fn downhill(normal: &Vec3) -> Vec3 {
    let down = math::down();
    let along = down - normal * down.dot(normal);
    math::normalize_or(along, Vec3::zeros())
}

/// Remove the part of `velocity` that points into the surface
pub fn remove_into_surface(velocity: Vec3, normal: &Vec3) -> Vec3 {
    let into = velocity.dot(normal);
    if into < 0.0 {
        velocity - normal * into
    } else {
        velocity
    }
}
