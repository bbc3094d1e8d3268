//! Scripted player input
//!
//! Held directions come from time segments; jump presses and ghost toggles
//! are instants that fire on the step whose interval contains them.

use std::time::Instant;

use stride_engine::foundation::math::utils::deg_to_rad;
use stride_engine::prelude::{CameraBasis, CharacterController, InputIntents, InputSnapshot};

/// Directions held over a span of simulated time
#[derive(Debug, Clone, Copy)]
struct Hold {
    start: f32,
    end: f32,
    intents: InputIntents,
    yaw_degrees: f32,
    pitch_degrees: f32,
}

/// A tour of the test level
#[derive(Debug, Clone)]
pub struct Script {
    holds: Vec<Hold>,
    jump_presses: Vec<f32>,
    ghost_toggles: Vec<(f32, bool)>,
    duration: f32,
}

impl Script {
    /// Walk up the gentle ramp, jump, fly, ghost through the wall, ride the
    /// jump pad and climb the ladder
    pub fn tour() -> Self {
        let hold = |start, end, intents, yaw_degrees, pitch_degrees| Hold {
            start,
            end,
            intents,
            yaw_degrees,
            pitch_degrees,
        };
        Self {
            holds: vec![
                hold(1.0, 2.4, InputIntents::FORWARD, 90.0, 0.0),
                hold(3.0, 4.0, InputIntents::FORWARD, -90.0, 0.0),
                hold(4.5, 5.5, InputIntents::FORWARD, 0.0, 30.0),
                hold(6.5, 8.5, InputIntents::FORWARD, -90.0, 0.0),
                hold(9.0, 10.0, InputIntents::FORWARD | InputIntents::LEFT, 90.0, 0.0),
                hold(11.0, 12.5, InputIntents::FORWARD, 180.0, 0.0),
                hold(12.5, 14.5, InputIntents::FORWARD, 180.0, 0.0),
            ],
            jump_presses: vec![2.6, 4.2, 4.4, 5.6, 5.8, 14.6],
            ghost_toggles: vec![(6.5, true), (8.0, false)],
            duration: 16.0,
        }
    }

    /// Simulated seconds the script covers
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Apply ghost toggles falling in `(from, to]`
    pub fn apply_toggles(&self, from: f32, to: f32, actor: &mut CharacterController) {
        for &(at, enabled) in &self.ghost_toggles {
            if at > from && at <= to {
                log::info!("t={at:.2}s ghost {}", if enabled { "on" } else { "off" });
                actor.set_ghost(enabled);
            }
        }
    }

    /// Input for the step covering `(from, to]`
    pub fn snapshot(&self, from: f32, to: f32, timestamp: Instant) -> InputSnapshot {
        let active = self.holds.iter().find(|hold| to > hold.start && to <= hold.end);
        let (mut intents, camera) = active.map_or_else(
            || (InputIntents::empty(), CameraBasis::default()),
            |hold| {
                (
                    hold.intents,
                    CameraBasis::from_yaw_pitch(deg_to_rad(hold.yaw_degrees), deg_to_rad(hold.pitch_degrees)),
                )
            },
        );

        if self.jump_presses.iter().any(|&at| at > from && at <= to) {
            intents |= InputIntents::JUMP;
        }
        InputSnapshot::new(intents, camera, timestamp)
    }
}
