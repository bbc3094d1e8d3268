//! Debug shape collection
//!
//! Shapes are plain data for whatever renderer (or log) consumes them.
//! Queued shapes expire after their duration; keyed shapes stay until
//! replaced or removed.

use std::collections::HashMap;

use crate::foundation::math::{Quat, Vec3, Vec4};

/// Key for shapes that stay until removed
pub type DebugShapeId = String;

/// Something to draw
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Segment between two points
    Line {
        /// Start point
        start: Vec3,
        /// End point
        end: Vec3,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },

    /// Sphere outline
    Sphere {
        /// World center
        center: Vec3,
        /// Radius
        radius: f32,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },

    /// Oriented box outline
    Box {
        /// World center
        center: Vec3,
        /// Half size along each local axis
        half_extents: Vec3,
        /// World orientation
        rotation: Quat,
        /// RGBA color
        color: Vec4,
        /// Remaining lifetime in seconds
        duration: f32,
    },
}

impl DebugShape {
    fn lifetime_mut(&mut self) -> &mut f32 {
        match self {
            Self::Line { duration, .. } | Self::Sphere { duration, .. } | Self::Box { duration, .. } => duration,
        }
    }

    /// Seconds left before a temporary shape is dropped
    pub fn duration(&self) -> f32 {
        match self {
            Self::Line { duration, .. } | Self::Sphere { duration, .. } | Self::Box { duration, .. } => *duration,
        }
    }

    /// RGBA color
    pub fn color(&self) -> Vec4 {
        match self {
            Self::Line { color, .. } | Self::Sphere { color, .. } | Self::Box { color, .. } => *color,
        }
    }

    /// Age the shape by `elapsed` seconds; true once it has run out
    fn age(&mut self, elapsed: f32) -> bool {
        let lifetime = self.lifetime_mut();
        *lifetime -= elapsed;
        *lifetime <= 0.0
    }
}

/// Collects debug shapes between frames
#[derive(Debug)]
pub struct DebugDrawSystem {
    frame_shapes: Vec<DebugShape>,
    keyed_shapes: HashMap<DebugShapeId, DebugShape>,

    /// When false nothing is queued and nothing is returned
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Empty, enabled collector
    pub fn new() -> Self {
        Self {
            frame_shapes: Vec::new(),
            keyed_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Queue a shape that lives for its own duration
    pub fn draw(&mut self, shape: DebugShape) {
        if self.enabled {
            self.frame_shapes.push(shape);
        }
    }

    /// Queue a line segment
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.draw(DebugShape::Line {
            start,
            end,
            color,
            duration,
        });
    }

    /// Store a shape under `key`, replacing any shape already there
    ///
    /// Keyed shapes never expire.
    pub fn draw_persistent(&mut self, key: impl Into<DebugShapeId>, shape: DebugShape) {
        if self.enabled {
            self.keyed_shapes.insert(key.into(), shape);
        }
    }

    /// Drop the shape stored under `key`
    pub fn clear_persistent(&mut self, key: &str) {
        self.keyed_shapes.remove(key);
    }

    /// Age queued shapes by `delta_time` and drop the expired ones
    pub fn update(&mut self, delta_time: f32) {
        self.frame_shapes.retain_mut(|shape| !shape.age(delta_time));
    }

    /// Everything to draw: queued shapes first, then keyed shapes by key
    pub fn shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }

        let mut keyed: Vec<(&DebugShapeId, &DebugShape)> = self.keyed_shapes.iter().collect();
        keyed.sort_by(|a, b| a.0.cmp(b.0));
        self.frame_shapes
            .iter()
            .chain(keyed.into_iter().map(|(_, shape)| shape))
            .collect()
    }

    /// Queued plus keyed shape count
    pub fn shape_count(&self) -> usize {
        self.frame_shapes.len() + self.keyed_shapes.len()
    }

    /// Forget every shape
    pub fn clear(&mut self) {
        self.frame_shapes.clear();
        self.keyed_shapes.clear();
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_sphere(duration: f32) -> DebugShape {
        DebugShape::Sphere {
            center: Vec3::zeros(),
            radius: 1.0,
            color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            duration,
        }
    }

    #[test]
    fn test_queued_shapes_expire() {
        let mut shapes = DebugDrawSystem::new();
        shapes.draw(red_sphere(1.0));

        shapes.update(0.5);
        assert_eq!(shapes.shape_count(), 1);
        assert!((shapes.shapes()[0].duration() - 0.5).abs() < 1e-6);

        shapes.update(0.6);
        assert_eq!(shapes.shape_count(), 0);
    }

    #[test]
    fn test_keyed_shapes_stay_until_removed() {
        let mut shapes = DebugDrawSystem::new();
        let ladder = DebugShape::Box {
            center: Vec3::new(0.0, 2.0, 0.0),
            half_extents: Vec3::new(0.5, 2.0, 0.1),
            rotation: Quat::identity(),
            color: Vec4::new(1.0, 1.0, 0.0, 1.0),
            duration: f32::INFINITY,
        };
        shapes.draw_persistent("ladder_1", ladder.clone());
        shapes.draw_persistent("ladder_0", red_sphere(0.0));
        shapes.draw_persistent("ladder_1", ladder.clone());

        shapes.update(100.0);
        assert_eq!(shapes.shape_count(), 2);
        assert_eq!(shapes.shapes()[1], &ladder);

        shapes.clear_persistent("ladder_1");
        assert_eq!(shapes.shape_count(), 1);
    }

    #[test]
    fn test_disabled_collector_ignores_shapes() {
        let mut shapes = DebugDrawSystem::new();
        shapes.enabled = false;
        shapes.draw_line(Vec3::zeros(), Vec3::x(), Vec4::new(1.0, 1.0, 1.0, 1.0), 1.0);
        assert_eq!(shapes.shape_count(), 0);
        assert!(shapes.shapes().is_empty());
    }
}
