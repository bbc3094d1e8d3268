//! Multi-sample ground probe
//!
//! Five parallel downward rays (center plus a cross of four offset samples)
//! start a step height above the feet. The highest accepted hit wins, which
//! lets an actor stand on a step edge even when its center ray misses.

use crate::config::GroundProbeConfig;
use crate::foundation::math::{self, Vec3};
use crate::locomotion::slope;
use crate::physics::{ColliderId, CollisionLayers, CollisionRegistry};

/// Number of rays cast per probe
pub const SAMPLE_COUNT: usize = 5;

/// Result of a ground probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Support was found within range
    pub is_grounded: bool,
    /// World height of the supporting surface
    pub ground_height: f32,
    /// Surface normal (world up when not grounded)
    pub normal: Vec3,
    /// The supporting collider
    pub collider: Option<ColliderId>,
    /// Angle between `normal` and world up, in radians
    pub slope_angle: f32,
}

impl Default for GroundHit {
    fn default() -> Self {
        Self::none()
    }
}

impl GroundHit {
    /// No ground found
    pub fn none() -> Self {
        Self {
            is_grounded: false,
            ground_height: 0.0,
            normal: math::up(),
            collider: None,
            slope_angle: 0.0,
        }
    }
}

/// Downward ray sampler
#[derive(Debug, Clone)]
pub struct GroundProbe {
    config: GroundProbeConfig,
    mask: CollisionLayers,
}

impl GroundProbe {
    /// Create a probe against world geometry
    pub fn new(config: GroundProbeConfig) -> Self {
        Self {
            config,
            mask: CollisionLayers::WORLD,
        }
    }

    /// Probe against a different set of layers
    pub fn with_mask(mut self, mask: CollisionLayers) -> Self {
        self.mask = mask;
        self
    }

    /// Probe geometry in use
    pub fn config(&self) -> &GroundProbeConfig {
        &self.config
    }

    /// Origins of the sample rays for feet at `feet`
    pub fn sample_origins(&self, feet: Vec3) -> [Vec3; SAMPLE_COUNT] {
        let offset = self.config.sample_offset;
        let top = feet + math::up() * self.config.step_height;
        [
            top,
            top + Vec3::new(offset, 0.0, 0.0),
            top + Vec3::new(-offset, 0.0, 0.0),
            top + Vec3::new(0.0, 0.0, offset),
            top + Vec3::new(0.0, 0.0, -offset),
        ]
    }

    /// Length of every sample ray
    pub fn ray_length(&self) -> f32 {
        self.config.step_height + self.config.ray_length
    }

    /// Find the ground under `feet`, ignoring the actor's own collider
    ///
    /// Ground is accepted from `ray_length` below the feet up to
    /// `step_height` above them.
    pub fn probe(&self, registry: &CollisionRegistry, feet: Vec3, exclude: Option<ColliderId>) -> GroundHit {
        let length = self.ray_length();

        let best = self
            .sample_origins(feet)
            .into_iter()
            .filter_map(|origin| {
                registry
                    .raycast(origin, math::down(), length, self.mask, exclude)
                    .into_iter()
                    .next()
            })
            .filter(|hit| {
                let rise = hit.point.y - feet.y;
                rise >= -self.config.ray_length && rise <= self.config.step_height
            })
            .max_by(|a, b| a.point.y.total_cmp(&b.point.y));

        let ground = match best {
            Some(hit) => GroundHit {
                is_grounded: true,
                ground_height: hit.point.y,
                normal: hit.normal,
                collider: Some(hit.collider),
                slope_angle: slope::slope_angle(&hit.normal),
            },
            None => GroundHit::none(),
        };

        log::trace!(
            "Ground probe at {:?}: grounded={} height={:.3} angle={:.1}°",
            feet,
            ground.is_grounded,
            ground.ground_height,
            ground.slope_angle.to_degrees()
        );
        ground
    }
}
