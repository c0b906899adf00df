//! Game settings
//!
//! Simulation tunables plus bootstrap options, optionally loaded from a JSON
//! file. Any field left out of the file keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{HEADLESS_TICKS, TARGET_FPS};
use crate::sim::{ConfigError, SimConfig};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {} is not valid JSON", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings are not valid JSON")]
    Json(#[source] serde_json::Error),
    #[error("target_fps must be at least 1")]
    ZeroFps,
    #[error(transparent)]
    Sim(#[from] ConfigError),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation tunables
    pub sim: SimConfig,
    /// Frame pacing for the windowed loop, and the logical clock in headless mode
    pub target_fps: u32,
    /// Ticks run by the headless smoke test
    pub headless_ticks: u64,
    /// Fixed run seed (random per run when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            target_fps: TARGET_FPS,
            headless_ticks: HEADLESS_TICKS,
            seed: None,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json).map_err(|err| match err {
            SettingsError::Json(source) => SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json).map_err(SettingsError::Json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.target_fps == 0 {
            return Err(SettingsError::ZeroFps);
        }
        self.sim.validate()?;
        Ok(())
    }

    /// Seed for the next run: the configured one, or one derived from the clock
    pub fn run_seed(&self) -> u64 {
        self.seed.unwrap_or_else(clock_seed)
    }

    /// Duration of one frame at `target_fps`
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}

/// Seed derived from the wall clock
pub(crate) fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.target_fps, 60);
        assert_eq!(settings.headless_ticks, 11);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let settings =
            Settings::from_json(r#"{ "seed": 9, "sim": { "pipe_speed": 4.0 } }"#).unwrap();
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.run_seed(), 9);
        assert_eq!(settings.sim.pipe_speed, 4.0);
        assert_eq!(settings.sim.pipe_gap, 150.0);
        assert_eq!(settings.target_fps, 60);
    }

    #[test]
    fn test_invalid_sim_config() {
        let err = Settings::from_json(r#"{ "sim": { "gap_margin": 200.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Sim(ConfigError::GapTooTall { .. })
        ));
    }

    #[test]
    fn test_zero_fps() {
        let err = Settings::from_json(r#"{ "target_fps": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::ZeroFps));
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
