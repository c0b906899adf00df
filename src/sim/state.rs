//! Game state and core simulation types
//!
//! The session owns everything that changes during a run: the fish, the pipes,
//! the score and the seeded RNG used for gap placement.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::{ConfigError, SimConfig};

/// Whether the run is still going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Active gameplay
    Running,
    /// Run ended (terminal)
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Fish left the top of the play area
    HitCeiling,
    /// Fish left the bottom of the play area
    HitFloor,
    /// Fish overlapped a pipe outside its gap
    HitPipe { id: u32 },
    /// Player quit
    Quit,
}

/// The player-controlled fish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    /// Horizontal position of the left edge (fixed for the session)
    pub x: f32,
    /// Vertical position of the top edge (0 = top of the play area)
    pub y: f32,
    /// Vertical velocity (positive = downward)
    pub velocity_y: f32,
    /// Edge length of the bounding square
    pub size: f32,
}

impl Fish {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            velocity_y: 0.0,
            size,
        }
    }

    /// Jump: velocity is overwritten, never accumulated
    #[inline]
    pub fn apply_impulse(&mut self, jump_speed: f32) {
        self.velocity_y = -jump_speed;
    }

    /// Advance one tick under gravity (bounds are the collision check's job)
    #[inline]
    pub fn integrate(&mut self, gravity: f32) {
        self.velocity_y += gravity;
        self.y += self.velocity_y;
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.size
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.size
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.size / 2.0
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A pipe pair with a passable gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the gap, fixed at spawn
    pub gap_top: f32,
    /// Credited to the score already
    pub scored: bool,
}

impl Pipe {
    #[inline]
    pub fn gap_bottom(&self, gap: f32) -> f32 {
        self.gap_top + gap
    }
}

/// All live pipes, in spawn order
#[derive(Debug, Clone, Default)]
pub struct PipeSet {
    pipes: Vec<Pipe>,
    next_id: u32,
}

impl PipeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a pipe at the right edge with `gap_top` drawn from `gap_top_range`
    ///
    /// The range must not be inverted; `SimConfig::validate` guarantees this.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        gap_top_range: (f32, f32),
        right_edge_x: f32,
    ) -> &Pipe {
        let (lowest, highest) = gap_top_range;
        let gap_top = rng.random_range(lowest..=highest);
        self.spawn_at(right_edge_x, gap_top)
    }

    /// Append a pipe with a known gap position
    pub(crate) fn spawn_at(&mut self, x: f32, gap_top: f32) -> &Pipe {
        let id = self.next_id;
        self.next_id += 1;
        self.pipes.push(Pipe {
            id,
            x,
            gap_top,
            scored: false,
        });
        log::debug!("Spawned pipe {} at x={} gap_top={:.1}", id, x, gap_top);
        &self.pipes[self.pipes.len() - 1]
    }

    /// Scroll every pipe left
    pub fn advance(&mut self, speed: f32) {
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
    }

    /// Drop pipes that are fully off the left edge
    pub fn cull(&mut self, width: f32) {
        self.pipes.retain(|p| {
            let keep = p.x + width >= 0.0;
            if !keep {
                log::debug!("Culled pipe {}", p.id);
            }
            keep
        });
    }

    /// Mark pipes whose right edge is behind the fish; returns how many were newly passed
    pub fn mark_scored_if_passed(&mut self, fish_x: f32, width: f32) -> u32 {
        let mut passed = 0;
        for pipe in self.pipes.iter_mut().filter(|p| !p.scored) {
            if pipe.x + width < fish_x {
                pipe.scored = true;
                passed += 1;
            }
        }
        passed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn as_slice(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: SimConfig,
    /// Run seed for reproducibility
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) fish: Fish,
    pub(crate) pipes: PipeSet,
    pub(crate) score: u32,
    pub(crate) status: SessionStatus,
    pub(crate) end_reason: Option<EndReason>,
    /// Completed ticks
    pub(crate) elapsed_ticks: u64,
}

impl Session {
    /// Start a run; gap placement is fully determined by `seed`
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let fish = Fish::new(config.fish_x, config.fish_start_y(), config.fish_size);
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fish,
            pipes: PipeSet::new(),
            score: 0,
            status: SessionStatus::Running,
            end_reason: None,
            elapsed_ticks: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn fish(&self) -> &Fish {
        &self.fish
    }

    pub fn pipes(&self) -> &PipeSet {
        &self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Running -> Ended; later calls are no-ops
    pub(crate) fn end(&mut self, reason: EndReason) {
        if self.status == SessionStatus::Ended {
            return;
        }
        self.status = SessionStatus::Ended;
        self.end_reason = Some(reason);
        log::info!(
            "Session ended ({:?}) with score {} after {} ticks",
            reason,
            self.score,
            self.elapsed_ticks
        );
    }
}
