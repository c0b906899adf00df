//! Collision detection for the fish
//!
//! Everything here is axis-aligned and pure. Overlap tests are strict: shapes
//! whose edges merely touch do not collide.

use super::state::{EndReason, Fish, Pipe};

/// Which boundary a fish crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Ceiling,
    Floor,
}

/// Check the fish against the top and bottom of the play area
#[inline]
pub fn out_of_bounds(fish: &Fish, play_height: f32) -> Option<Bounds> {
    if fish.y < 0.0 {
        Some(Bounds::Ceiling)
    } else if fish.bottom() > play_height {
        Some(Bounds::Floor)
    } else {
        None
    }
}

/// Horizontal spans overlap (touching edges don't count)
#[inline]
pub fn overlaps_horizontally(fish: &Fish, pipe: &Pipe, pipe_width: f32) -> bool {
    fish.right() > pipe.x && fish.x < pipe.x + pipe_width
}

/// Fish lies entirely inside the gap
#[inline]
pub fn fits_gap(fish: &Fish, pipe: &Pipe, gap: f32) -> bool {
    fish.y >= pipe.gap_top && fish.bottom() <= pipe.gap_bottom(gap)
}

/// Check the fish against a single pipe
pub fn hits_pipe(fish: &Fish, pipe: &Pipe, pipe_width: f32, gap: f32) -> bool {
    overlaps_horizontally(fish, pipe, pipe_width) && !fits_gap(fish, pipe, gap)
}

/// First pipe (in spawn order) the fish collides with
pub fn first_pipe_hit<'a>(
    fish: &Fish,
    pipes: impl IntoIterator<Item = &'a Pipe>,
    pipe_width: f32,
    gap: f32,
) -> Option<&'a Pipe> {
    pipes
        .into_iter()
        .find(|pipe| hits_pipe(fish, pipe, pipe_width, gap))
}

/// Full collision pass for a tick: bounds first, then pipes
pub fn evaluate(
    fish: &Fish,
    pipes: &[Pipe],
    play_height: f32,
    pipe_width: f32,
    gap: f32,
) -> Option<EndReason> {
    if let Some(bounds) = out_of_bounds(fish, play_height) {
        return Some(match bounds {
            Bounds::Ceiling => EndReason::HitCeiling,
            Bounds::Floor => EndReason::HitFloor,
        });
    }

    first_pipe_hit(fish, pipes, pipe_width, gap).map(|pipe| EndReason::HitPipe { id: pipe.id })
}
