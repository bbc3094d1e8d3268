//! Debug module for visualization and debugging tools
//!
//! Observational only: the simulation never depends on anything here.

pub mod collision_debug;
pub mod draw;

pub use collision_debug::{state_color, CollisionDebugColors, CollisionDebugVisualizer};
pub use draw::{DebugDrawSystem, DebugShape, DebugShapeId};
