//! Kinematic character locomotion
//!
//! Built on the collision registry: a multi-ray ground probe classifies
//! support, a single-pass wall resolver pushes actors out of level geometry,
//! and [`CharacterController`] runs the per-actor state machine that turns
//! input, gravity and momentum into a displacement each fixed step.

pub mod controller;
pub mod ground_probe;
pub mod input;
pub mod ladder;
pub mod momentum;
pub mod slope;
pub mod state;
pub mod wall_resolver;

pub use controller::CharacterController;
pub use ground_probe::{GroundHit, GroundProbe};
pub use input::{CameraBasis, DoubleTapDetector, InputIntents, InputSnapshot};
pub use ladder::LadderVolume;
pub use momentum::Momentum;
pub use slope::SlopeClass;
pub use state::{LocomotionState, LocomotionStep};
pub use wall_resolver::WallResolver;
