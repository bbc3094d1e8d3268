//! Locomotion states and the per-tick result

use std::fmt;

use crate::foundation::math::Vec3;
use crate::locomotion::ground_probe::GroundHit;

/// Exactly one movement mode is active per actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocomotionState {
    /// Standing or walking on a walkable surface
    Grounded,
    /// Falling or jumping; the next probe decides where it lands
    #[default]
    Airborne,
    /// On a surface too steep to stand on
    Sliding,
    /// Attached to a ladder volume
    Climbing,
    /// Free 3D movement with wall collision
    Flying,
    /// Free 3D movement with no collision queries at all
    Ghost,
}

impl LocomotionState {
    /// Gravity accumulates in this state
    pub fn uses_gravity(self) -> bool {
        matches!(self, Self::Airborne | Self::Sliding)
    }

    /// Walls push the actor out in this state
    pub fn resolves_walls(self) -> bool {
        !matches!(self, Self::Ghost)
    }

    /// The actor stands on something
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Grounded | Self::Sliding)
    }

    /// Movement follows the camera's full look direction
    pub fn is_free_flight(self) -> bool {
        matches!(self, Self::Flying | Self::Ghost)
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Grounded => "grounded",
            Self::Airborne => "airborne",
            Self::Sliding => "sliding",
            Self::Climbing => "climbing",
            Self::Flying => "flying",
            Self::Ghost => "ghost",
        };
        f.write_str(name)
    }
}

/// What one locomotion update did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionStep {
    /// State after the update
    pub state: LocomotionState,
    /// State before the update
    pub previous_state: LocomotionState,
    /// Total movement this tick, push-out included
    pub displacement: Vec3,
    /// Correction applied by the wall resolver
    pub push_out: Vec3,
    /// Ground probe result (not grounded when no probe ran)
    pub ground: GroundHit,
    /// A double tap toggled flight this tick
    pub flight_toggled: bool,
}

impl LocomotionStep {
    /// The state changed during this update
    pub fn changed_state(&self) -> bool {
        self.state != self.previous_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_properties() {
        assert!(LocomotionState::Airborne.uses_gravity());
        assert!(!LocomotionState::Climbing.uses_gravity());
        assert!(!LocomotionState::Flying.uses_gravity());
        assert!(LocomotionState::Flying.resolves_walls());
        assert!(!LocomotionState::Ghost.resolves_walls());
        assert!(LocomotionState::Sliding.is_supported());
    }

    #[test]
    fn test_default_is_airborne() {
        assert_eq!(LocomotionState::default(), LocomotionState::Airborne);
        assert_eq!(LocomotionState::Climbing.to_string(), "climbing");
    }
}
