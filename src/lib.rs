//! Jumpy-fish - a side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, scoring)
//! - `renderer`: wgpu rendering of simulation snapshots
//! - `settings`: Tunables loaded from JSON
//! - `app`: Windowed game loop (winit)
//! - `headless`: Bounded smoke-test runner without a display

pub mod app;
pub mod error;
pub mod headless;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{RunError, SetupError};
pub use settings::{Settings, SettingsError};

/// Game configuration defaults
pub mod consts {
    /// Play area dimensions (pixels, origin at the top-left)
    pub const PLAY_WIDTH: f32 = 600.0;
    pub const PLAY_HEIGHT: f32 = 400.0;

    /// Downward acceleration added to the fish velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Upward speed the fish gets from a jump (velocity is set to -JUMP_SPEED)
    pub const JUMP_SPEED: f32 = 10.0;

    /// Fish defaults
    pub const FISH_X: f32 = 50.0;
    pub const FISH_SIZE: f32 = 30.0;

    /// Pipe defaults
    pub const PIPE_SPEED: f32 = 3.0;
    pub const PIPE_WIDTH: f32 = 80.0;
    pub const PIPE_GAP: f32 = 150.0;
    /// Minimum distance between a gap and the top/bottom edge
    pub const GAP_MARGIN: f32 = 50.0;
    /// Time between pipe spawns
    pub const PIPE_FREQ_MS: u64 = 1500;

    /// Frame pacing for the windowed loop
    pub const TARGET_FPS: u32 = 60;
    /// Longest frame delta fed to the spawn timer (avoids pipe bursts after a stall)
    pub const MAX_FRAME_DELTA_MS: u64 = 100;
    /// Ticks run by the headless smoke test
    pub const HEADLESS_TICKS: u64 = 11;
}
