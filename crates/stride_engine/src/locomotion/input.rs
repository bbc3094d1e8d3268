//! Per-tick input for a locomotion actor
//!
//! The input source (keyboard, AI, script) reduces its state to an
//! [`InputSnapshot`] each tick. Timestamps travel with the snapshot so the
//! double-tap window is measured in simulation time.

use std::time::{Duration, Instant};

use bitflags::bitflags;

use crate::foundation::math::{self, Vec3};

bitflags! {
    /// Movement intents for one tick
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputIntents: u8 {
        /// Move along the camera's forward direction
        const FORWARD = 1 << 0;
        /// Move against the camera's forward direction
        const BACK = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Jump button is down
        const JUMP = 1 << 4;
    }
}

impl InputIntents {
    /// Forward minus back, in {-1, 0, 1}
    pub fn forward_axis(self) -> f32 {
        axis(self.contains(Self::FORWARD), self.contains(Self::BACK))
    }

    /// Right minus left, in {-1, 0, 1}
    pub fn strafe_axis(self) -> f32 {
        axis(self.contains(Self::RIGHT), self.contains(Self::LEFT))
    }

    /// Whether the jump button is down this tick
    pub fn jump_held(self) -> bool {
        self.contains(Self::JUMP)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Camera orientation the input is relative to
///
/// `forward` is the full look direction (it may pitch up or down) and
/// `right` is horizontal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Unit look direction
    pub forward: Vec3,
    /// Unit horizontal right direction
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::from_yaw_pitch(0.0, 0.0)
    }
}

impl CameraBasis {
    /// Build a basis from a look direction
    ///
    /// Looking straight up or down keeps the default right axis.
    pub fn looking(forward: Vec3) -> Self {
        let forward = math::normalize_or(forward, Vec3::z());
        let right = math::normalize_or(math::horizontal(forward.cross(&math::up())), -Vec3::x());
        Self { forward, right }
    }

    /// Build a basis from yaw (about +Y, zero looking down +Z) and pitch
    /// (positive looks up), both in radians
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let forward = Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch);
        let right = Vec3::new(-cos_yaw, 0.0, sin_yaw);
        Self { forward, right }
    }

    /// Horizontal forward direction
    pub fn flat_forward(&self) -> Vec3 {
        math::normalize_or(math::horizontal(self.forward), math::up().cross(&self.right))
    }

    /// Unit horizontal move direction for walking, zero without input
    ///
    /// Pitch is ignored, so looking at the floor still walks at full speed.
    pub fn yaw_relative(&self, intents: InputIntents) -> Vec3 {
        let wish = self.flat_forward() * intents.forward_axis() + self.right * intents.strafe_axis();
        math::normalize_or(math::horizontal(wish), Vec3::zeros())
    }

    /// Unit 3D move direction for flying, zero without input
    pub fn look_relative(&self, intents: InputIntents) -> Vec3 {
        let wish = self.forward * intents.forward_axis() + self.right * intents.strafe_axis();
        math::normalize_or(wish, Vec3::zeros())
    }
}

/// Everything an actor reads from its input source in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Buttons held this tick
    pub intents: InputIntents,
    /// Camera the directions are relative to
    pub camera: CameraBasis,
    /// Simulation time of this tick
    pub timestamp: Instant,
}

impl InputSnapshot {
    /// Create a snapshot
    pub fn new(intents: InputIntents, camera: CameraBasis, timestamp: Instant) -> Self {
        Self {
            intents,
            camera,
            timestamp,
        }
    }

    /// No input this tick
    pub fn idle(timestamp: Instant) -> Self {
        Self::new(InputIntents::empty(), CameraBasis::default(), timestamp)
    }
}

/// Detects two jump presses less than a window apart
///
/// Fed only on jump rising edges. A completed double tap clears the stored edge,
/// so three quick presses toggle once rather than twice.
#[derive(Debug, Clone)]
pub struct DoubleTapDetector {
    window: Duration,
    last_press: Option<Instant>,
}

impl DoubleTapDetector {
    /// Create a detector with the given window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
        }
    }

    /// Register a press; returns `true` when it completes a double tap
    pub fn register(&mut self, at: Instant) -> bool {
        match self.last_press {
            Some(previous) if at.saturating_duration_since(previous) < self.window => {
                self.last_press = None;
                true
            }
            _ => {
                self.last_press = Some(at);
                false
            }
        }
    }

    /// Forget the pending press
    pub fn reset(&mut self) {
        self.last_press = None;
    }

    /// Time of the press waiting for a partner
    pub fn pending(&self) -> Option<Instant> {
        self.last_press
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils::deg_to_rad;
    use approx::assert_relative_eq;

    #[test]
    fn test_axes() {
        let intents = InputIntents::FORWARD | InputIntents::LEFT;
        assert_eq!(intents.forward_axis(), 1.0);
        assert_eq!(intents.strafe_axis(), -1.0);
        assert_eq!((InputIntents::FORWARD | InputIntents::BACK).forward_axis(), 0.0);
    }

    #[test]
    fn test_yaw_relative_ignores_pitch() {
        let camera = CameraBasis::from_yaw_pitch(0.0, deg_to_rad(-60.0));
        let direction = camera.yaw_relative(InputIntents::FORWARD);
        assert_relative_eq!(direction, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_diagonal_is_unit_length() {
        let camera = CameraBasis::default();
        let direction = camera.yaw_relative(InputIntents::FORWARD | InputIntents::RIGHT);
        assert_relative_eq!(direction.magnitude(), 1.0, epsilon = 1e-5);
        assert!(camera.yaw_relative(InputIntents::empty()).magnitude() < 1e-6);
    }

    #[test]
    fn test_look_relative_follows_pitch() {
        let camera = CameraBasis::from_yaw_pitch(0.0, deg_to_rad(90.0));
        let direction = camera.look_relative(InputIntents::FORWARD);
        assert_relative_eq!(direction, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_looking_matches_yaw_pitch() {
        let from_angles = CameraBasis::from_yaw_pitch(deg_to_rad(90.0), 0.0);
        let from_vector = CameraBasis::looking(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(from_angles.forward, from_vector.forward, epsilon = 1e-5);
        assert_relative_eq!(from_angles.right, from_vector.right, epsilon = 1e-5);
    }

    #[test]
    fn test_double_tap_window() {
        let start = Instant::now();
        let mut detector = DoubleTapDetector::new(Duration::from_millis(300));

        assert!(!detector.register(start));
        assert!(detector.register(start + Duration::from_millis(200)));
        assert!(detector.pending().is_none());

        assert!(!detector.register(start + Duration::from_millis(1000)));
        assert!(!detector.register(start + Duration::from_millis(1500)));
    }

    #[test]
    fn test_double_tap_window_is_exclusive() {
        let start = Instant::now();
        let mut detector = DoubleTapDetector::new(Duration::from_millis(300));

        assert!(!detector.register(start));
        assert!(!detector.register(start + Duration::from_millis(300)));
        // The late press now waits for its own partner
        assert!(detector.register(start + Duration::from_millis(599)));
    }
}
