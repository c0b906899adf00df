//! Simulation tunables
//!
//! Every constant the simulation reads lives here, bundled into one immutable
//! value handed to `Session::new`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Invalid tunables rejected at session construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("spawn interval must be at least 1 ms")]
    ZeroSpawnInterval,
    #[error(
        "pipe gap {gap} plus twice the gap margin {margin} does not fit in play height {play_height}"
    )]
    GapTooTall {
        gap: f32,
        margin: f32,
        play_height: f32,
    },
}

/// Simulation configuration (all distances in play-area pixels, speeds per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub gravity: f32,
    /// Magnitude of the upward velocity a jump sets
    pub jump_speed: f32,
    pub pipe_speed: f32,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Milliseconds between pipe spawns
    pub spawn_interval_ms: u64,
    pub play_width: f32,
    pub play_height: f32,
    pub fish_x: f32,
    pub fish_size: f32,
    /// Minimum distance between a gap and the top/bottom edge
    pub gap_margin: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            pipe_speed: PIPE_SPEED,
            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            spawn_interval_ms: PIPE_FREQ_MS,
            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,
            fish_x: FISH_X,
            fish_size: FISH_SIZE,
            gap_margin: GAP_MARGIN,
        }
    }
}

impl SimConfig {
    /// Check every tunable; the first violation wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("gravity", self.gravity),
            ("jump_speed", self.jump_speed),
            ("pipe_speed", self.pipe_speed),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("play_width", self.play_width),
            ("play_height", self.play_height),
            ("fish_x", self.fish_x),
            ("fish_size", self.fish_size),
            ("gap_margin", self.gap_margin),
        ];
        for (name, value) in positives {
            // NaN fails this comparison too
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }

        // Same expression the spawner samples from, so rounding cannot disagree
        let (lowest, highest) = self.gap_top_range();
        if highest < lowest {
            return Err(ConfigError::GapTooTall {
                gap: self.pipe_gap,
                margin: self.gap_margin,
                play_height: self.play_height,
            });
        }

        Ok(())
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Lowest and highest legal `gap_top` for a freshly spawned pipe
    pub fn gap_top_range(&self) -> (f32, f32) {
        (
            self.gap_margin,
            self.play_height - self.pipe_gap - self.gap_margin,
        )
    }

    /// Vertical start position of the fish (middle of the play area)
    pub fn fish_start_y(&self) -> f32 {
        self.play_height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive() {
        let config = SimConfig {
            gravity: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "gravity",
                value: 0.0
            })
        );

        let config = SimConfig {
            fish_size: -30.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "fish_size", .. })
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let config = SimConfig {
            pipe_speed: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "pipe_speed", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_spawn_interval() {
        let config = SimConfig {
            spawn_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSpawnInterval));
    }

    #[test]
    fn test_gap_must_fit() {
        // 150 + 2 * 125 = 400 fits exactly
        let config = SimConfig {
            gap_margin: 125.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.gap_top_range(), (125.0, 125.0));

        let config = SimConfig {
            gap_margin: 126.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GapTooTall { .. })
        ));
    }

    #[test]
    fn test_rejects_gap_that_only_fits_before_rounding() {
        // gap + 2 * margin <= height, yet height - gap - margin < margin in f32
        let config = SimConfig {
            play_height: 335.5722,
            pipe_gap: 310.7168,
            gap_margin: 12.427709,
            ..Default::default()
        };
        assert!(config.pipe_gap + 2.0 * config.gap_margin <= config.play_height);
        let (lowest, highest) = config.gap_top_range();
        assert!(highest < lowest);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GapTooTall { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"gravity": 0.25}"#).unwrap();
        assert_eq!(config.gravity, 0.25);
        assert_eq!(config.pipe_width, PIPE_WIDTH);
        assert_eq!(config.spawn_interval(), Duration::from_millis(1500));
    }
}
