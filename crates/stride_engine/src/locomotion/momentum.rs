//! Exponentially decaying momentum from external impulses

use crate::foundation::math::Vec3;

/// Horizontal velocity left over from pads, knockback and similar impulses
///
/// Decays as `m *= exp(-damping * dt)` and snaps to exactly zero once its
/// squared magnitude drops below `epsilon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    velocity: Vec3,
    damping: f32,
    epsilon: f32,
}

impl Momentum {
    /// Create an empty accumulator
    pub fn new(damping: f32, epsilon: f32) -> Self {
        Self {
            velocity: Vec3::zeros(),
            damping,
            epsilon,
        }
    }

    /// Add an impulse (velocity change)
    pub fn add(&mut self, impulse: Vec3) {
        if impulse.iter().all(|c| c.is_finite()) {
            self.velocity += impulse;
        }
    }

    /// Decay by `dt` seconds and return the remaining velocity
    pub fn tick(&mut self, dt: f32) -> Vec3 {
        if dt > 0.0 {
            self.velocity *= (-self.damping * dt).exp();
        }
        if self.velocity.magnitude_squared() < self.epsilon {
            self.velocity = Vec3::zeros();
        }
        self.velocity
    }

    /// Remove the component pointing into a surface with normal `normal`
    pub fn block(&mut self, normal: &Vec3) {
        let into = self.velocity.dot(normal);
        if into < 0.0 {
            self.velocity -= normal * into;
        }
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// No momentum left
    pub fn is_zero(&self) -> bool {
        self.velocity == Vec3::zeros()
    }
}
