//! Demo controller that plays the game
//!
//! Looks at the last snapshot and flaps whenever the fish is falling and has
//! sunk below the centre of the next gap it still has to clear.

use super::tick::{InputEvent, Snapshot};

/// How far below the target the fish may sink before flapping
///
/// A flap lifts the fish by roughly 95 px with the default tunables, so this
/// keeps the oscillation inside a 150 px gap.
pub const AUTOPILOT_SLACK: f32 = 40.0;

/// Vertical centre the fish should hover around
pub fn target_y(snapshot: &Snapshot) -> f32 {
    let fish = &snapshot.fish;
    snapshot
        .pipes
        .iter()
        .find(|p| p.x + p.width >= fish.x)
        .map(|p| (p.gap_top + p.gap_bottom) / 2.0)
        .unwrap_or(snapshot.play_size.y / 2.0)
}

/// Event to feed into the next tick, if any
pub fn autopilot(snapshot: &Snapshot) -> Option<InputEvent> {
    if !snapshot.is_running() {
        return None;
    }

    let fish = &snapshot.fish;
    let falling = fish.velocity_y > 0.0;
    if falling && fish.center_y() > target_y(snapshot) + AUTOPILOT_SLACK {
        Some(InputEvent::Jump)
    } else {
        None
    }
}
