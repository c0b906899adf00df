//! Per-tick simulation step
//!
//! One call to `Session::tick` applies the tick's input events, integrates the
//! fish, scrolls the pipes, checks collisions and updates the score.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::state::{EndReason, Fish, Session, SessionStatus};

/// Inputs for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Flap upward
    Jump,
    /// Spawn timer fired
    Spawn,
    /// Stop the run
    Quit,
}

/// A pipe as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub scored: bool,
}

/// Read-only copy of the session after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: u32,
    pub status: SessionStatus,
    pub end_reason: Option<EndReason>,
    pub fish: Fish,
    pub pipes: Vec<PipeView>,
    pub play_size: Vec2,
}

impl Snapshot {
    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }
}

impl Session {
    /// Advance the session by one tick
    ///
    /// Once the session has ended this only returns the final snapshot.
    pub fn tick(&mut self, events: &[InputEvent]) -> Snapshot {
        if self.status == SessionStatus::Ended {
            return self.snapshot();
        }

        if events.contains(&InputEvent::Quit) {
            self.end(EndReason::Quit);
            return self.snapshot();
        }

        for event in events {
            match event {
                InputEvent::Jump => self.fish.apply_impulse(self.config.jump_speed),
                InputEvent::Spawn => {
                    self.pipes.spawn(
                        &mut self.rng,
                        self.config.gap_top_range(),
                        self.config.play_width,
                    );
                }
                InputEvent::Quit => {}
            }
        }

        self.fish.integrate(self.config.gravity);

        self.pipes.advance(self.config.pipe_speed);
        self.pipes.cull(self.config.pipe_width);

        if let Some(reason) = collision::evaluate(
            &self.fish,
            self.pipes.as_slice(),
            self.config.play_height,
            self.config.pipe_width,
            self.config.pipe_gap,
        ) {
            // Terminal tick: score and tick count stay as they were
            self.end(reason);
            return self.snapshot();
        }

        self.score += self
            .pipes
            .mark_scored_if_passed(self.fish.x, self.config.pipe_width);
        self.elapsed_ticks += 1;

        self.snapshot()
    }

    /// Copy out the current state for rendering
    pub fn snapshot(&self) -> Snapshot {
        let width = self.config.pipe_width;
        let gap = self.config.pipe_gap;
        Snapshot {
            tick: self.elapsed_ticks,
            score: self.score,
            status: self.status,
            end_reason: self.end_reason,
            fish: self.fish,
            pipes: self
                .pipes
                .iter()
                .map(|p| PipeView {
                    id: p.id,
                    x: p.x,
                    width,
                    gap_top: p.gap_top,
                    gap_bottom: p.gap_bottom(gap),
                    scored: p.scored,
                })
                .collect(),
            play_size: Vec2::new(self.config.play_width, self.config.play_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;

    fn session() -> Session {
        Session::new(SimConfig::default(), 12345).unwrap()
    }

    #[test]
    fn test_tick_without_jump() {
        let mut session = session();
        let snap = session.tick(&[]);
        assert_eq!(snap.fish.velocity_y, 0.5);
        assert_eq!(snap.fish.y, 200.5);
        assert_eq!(snap.tick, 1);
        assert!(snap.is_running());
    }

    #[test]
    fn test_tick_with_jump() {
        let mut session = session();
        let snap = session.tick(&[InputEvent::Jump]);
        assert_eq!(snap.fish.velocity_y, -9.5);
        assert_eq!(snap.fish.y, 190.5);
    }

    #[test]
    fn test_jump_overwrites_falling_velocity() {
        let mut session = session();
        for _ in 0..10 {
            session.tick(&[]);
        }
        assert!(session.fish().velocity_y > 4.9);
        let snap = session.tick(&[InputEvent::Jump, InputEvent::Jump]);
        assert_eq!(snap.fish.velocity_y, -9.5);
    }

    #[test]
    fn test_spawn_event_adds_pipe_at_right_edge() {
        let mut session = session();
        let snap = session.tick(&[InputEvent::Spawn]);
        assert_eq!(snap.pipes.len(), 1);
        // Spawned at 600 then advanced once this tick
        assert_eq!(snap.pipes[0].x, 597.0);
        assert_eq!(snap.pipes[0].gap_bottom - snap.pipes[0].gap_top, 150.0);
        assert!(snap.pipes[0].gap_top >= 50.0 && snap.pipes[0].gap_top <= 200.0);
    }

    #[test]
    fn test_spawn_with_tightest_valid_gap() {
        // 150 + 2 * 125 = 400: the only legal gap_top is 125
        let config = SimConfig {
            gap_margin: 125.0,
            ..SimConfig::default()
        };
        let mut session = Session::new(config, 8).unwrap();
        let snap = session.tick(&[InputEvent::Spawn]);
        assert_eq!(snap.pipes.len(), 1);
        assert_eq!(snap.pipes[0].gap_top, 125.0);
    }

    #[test]
    fn test_rounded_gap_range_is_rejected_before_spawning() {
        let config = SimConfig {
            play_height: 335.5722,
            pipe_gap: 310.7168,
            gap_margin: 12.427709,
            ..SimConfig::default()
        };
        assert!(Session::new(config, 1).is_err());
    }

    #[test]
    fn test_hit_pipe_ends_without_scoring() {
        let mut session = session();
        // Fish spans x 50..80; pipe spans 37..117 after this tick's advance
        session.pipes.spawn_at(40.0, 250.0);
        // An already-passed pipe that would score this tick
        session.pipes.spawn_at(-31.0, 100.0);

        let snap = session.tick(&[]);
        assert_eq!(snap.status, SessionStatus::Ended);
        assert_eq!(snap.end_reason, Some(EndReason::HitPipe { id: 0 }));
        assert_eq!(snap.score, 0);
        assert_eq!(snap.tick, 0);
    }

    #[test]
    fn test_passing_pipe_scores_once() {
        let mut session = session();
        // After advancing: x = -34, right edge 46 < 50
        session.pipes.spawn_at(-31.0, 100.0);

        let snap = session.tick(&[]);
        assert!(snap.is_running());
        assert_eq!(snap.score, 1);
        assert!(snap.pipes[0].scored);

        let snap = session.tick(&[]);
        assert_eq!(snap.score, 1);
    }

    #[test]
    fn test_falling_out_ends_session() {
        let mut session = session();
        let mut ticks = 0;
        while session.is_running() {
            session.tick(&[]);
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(session.end_reason(), Some(EndReason::HitFloor));
    }

    #[test]
    fn test_ended_session_is_frozen() {
        let mut session = session();
        let final_snap = session.tick(&[InputEvent::Quit]);
        assert_eq!(final_snap.status, SessionStatus::Ended);
        assert_eq!(final_snap.end_reason, Some(EndReason::Quit));
        // Quit happens before physics
        assert_eq!(final_snap.fish.y, 200.0);

        let snap = session.tick(&[InputEvent::Jump, InputEvent::Spawn]);
        assert_eq!(snap, final_snap);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = session();
        let snap = session.tick(&[InputEvent::Spawn]);
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
