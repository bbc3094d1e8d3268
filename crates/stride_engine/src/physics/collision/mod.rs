//! Collision shapes and narrow-phase geometry
//!
//! # Architecture
//!
//! - **Local Space Storage**: Collider shapes are stored relative to their owner
//! - **On-Demand Transformation**: Shapes move to world space only during tests
//! - **Pure Queries**: Every test is a function of (shape, transform) pairs;
//!   colliders never mutate each other
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, AABBs, spheres and oriented boxes
//! - [`shape`] - Collider shapes, world-space shapes and penetration response

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Aabb, BoundingSphere, OrientedBox, Ray, RayHit};
pub use shape::{ColliderShape, CollisionResponse, WorldSpaceShape};
