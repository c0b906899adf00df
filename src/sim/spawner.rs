//! Fixed-interval pipe spawn timer
//!
//! Accumulates elapsed time (real or logical) and reports how many spawn
//! intervals have completed. Cadence depends only on time, never on how many
//! frames were rendered in between.

use std::time::Duration;

use super::tick::InputEvent;

#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: Duration,
    accumulator: Duration,
}

impl SpawnTimer {
    /// `interval` must be non-zero (guaranteed by a validated `SimConfig`)
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero());
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time until the next spawn fires
    #[cfg(test)]
    fn remaining(&self) -> Duration {
        self.interval - self.accumulator
    }

    /// Add elapsed time; returns the number of spawns that came due
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulator += dt;
        let mut due = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            due += 1;
        }
        due
    }

    /// Like `advance`, but as events ready to hand to `Session::tick`
    pub fn spawn_events(&mut self, dt: Duration) -> impl Iterator<Item = InputEvent> {
        let due = self.advance(dt);
        (0..due).map(|_| InputEvent::Spawn)
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
