//! Shape generation for 2D primitives
//!
//! Everything is built from axis-aligned rectangles in play-area pixels
//! (origin top-left, y down). `RenderState` maps them to NDC.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::Snapshot;

/// Score digit height in pixels
pub const DIGIT_HEIGHT: f32 = 36.0;
/// Distance from the top edge to the score
pub const SCORE_TOP: f32 = 20.0;
const DIGIT_SPACING: f32 = 8.0;

/// Append two triangles covering the rectangle
pub fn rect(out: &mut Vec<Vertex>, top_left: Vec2, size: Vec2, color: [f32; 4]) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let min = top_left;
    let max = top_left + size;

    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

// Seven-segment masks, bit order: a b c d e f g
//  aaa
// f   b
//  ggg
// e   c
//  ddd
const SEGMENTS: [u8; 10] = [
    0b1111110, // 0
    0b0110000, // 1
    0b1101101, // 2
    0b1111001, // 3
    0b0110011, // 4
    0b1011011, // 5
    0b1011111, // 6
    0b1110000, // 7
    0b1111111, // 8
    0b1111011, // 9
];

/// Width of a digit for a given height
#[inline]
pub fn digit_width(height: f32) -> f32 {
    height / 2.0
}

/// Append a seven-segment digit (0-9)
pub fn digit(out: &mut Vec<Vertex>, value: u8, top_left: Vec2, height: f32, color: [f32; 4]) {
    let Some(&mask) = SEGMENTS.get(value as usize) else {
        return;
    };
    let w = digit_width(height);
    let t = height / 8.0;
    let half = height / 2.0;
    let Vec2 { x, y } = top_left;

    let segments = [
        (Vec2::new(x, y), Vec2::new(w, t)),                        // a
        (Vec2::new(x + w - t, y), Vec2::new(t, half)),             // b
        (Vec2::new(x + w - t, y + half), Vec2::new(t, half)),      // c
        (Vec2::new(x, y + height - t), Vec2::new(w, t)),           // d
        (Vec2::new(x, y + half), Vec2::new(t, half)),              // e
        (Vec2::new(x, y), Vec2::new(t, half)),                     // f
        (Vec2::new(x, y + half - t / 2.0), Vec2::new(w, t)),       // g
    ];

    for (i, (pos, size)) in segments.into_iter().enumerate() {
        if mask & (0b1000000 >> i) != 0 {
            rect(out, pos, size, color);
        }
    }
}

/// Append a number centred horizontally on `center_x`
pub fn number(out: &mut Vec<Vertex>, value: u32, center_x: f32, top: f32, height: f32, color: [f32; 4]) {
    let digits: Vec<u8> = value
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect();
    let w = digit_width(height);
    let total = digits.len() as f32 * w + (digits.len() as f32 - 1.0) * DIGIT_SPACING;

    let mut x = center_x - total / 2.0;
    for d in digits {
        digit(out, d, Vec2::new(x, top), height, color);
        x += w + DIGIT_SPACING;
    }
}

/// Build every triangle for a snapshot (background comes from the clear color)
pub fn scene(snapshot: &Snapshot) -> Vec<Vertex> {
    let play = snapshot.play_size;
    let mut vertices = Vec::with_capacity(6 * (2 * snapshot.pipes.len() + 1) + 6 * 7 * 4);

    for pipe in &snapshot.pipes {
        // Upper pipe: top edge down to the gap
        rect(
            &mut vertices,
            Vec2::new(pipe.x, 0.0),
            Vec2::new(pipe.width, pipe.gap_top),
            colors::PIPE,
        );
        // Lower pipe: bottom of the gap down to the floor
        rect(
            &mut vertices,
            Vec2::new(pipe.x, pipe.gap_bottom),
            Vec2::new(pipe.width, play.y - pipe.gap_bottom),
            colors::PIPE,
        );
    }

    let fish = &snapshot.fish;
    rect(
        &mut vertices,
        fish.top_left(),
        Vec2::splat(fish.size),
        colors::FISH,
    );

    number(
        &mut vertices,
        snapshot.score,
        play.x / 2.0,
        SCORE_TOP,
        DIGIT_HEIGHT,
        colors::SCORE,
    );

    if !snapshot.is_running() {
        rect(&mut vertices, Vec2::ZERO, play, colors::GAME_OVER_OVERLAY);
    }

    vertices
}
