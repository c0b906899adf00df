//! Jumpy-fish entry point
//!
//! Parses flags, loads settings and runs either the windowed game or the
//! headless smoke test. Exit codes: 0 success, 1 setup failure, 2 invalid
//! configuration.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use jumpy_fish::headless::{self, HeadlessOptions, RunSummary};
use jumpy_fish::{RunError, Settings, app};

const EXIT_SETUP: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "jumpy-fish", version, about = "Keep the fish clear of the pipes")]
struct Cli {
    /// Run without a window for a bounded number of ticks
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Fixed RNG seed (random when omitted)
    #[arg(long, value_name = "S")]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip offscreen rendering in headless mode (no GPU needed)
    #[arg(long)]
    no_render: bool,

    /// Let the built-in controller play
    #[arg(long)]
    autopilot: bool,
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(seed) = cli.seed {
        settings.seed = Some(seed);
    }
    if let Some(ticks) = cli.ticks {
        settings.headless_ticks = ticks;
    }

    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn play(cli: &Cli, settings: Settings) -> Result<RunSummary, RunError> {
    if cli.headless {
        let options = HeadlessOptions {
            ticks: settings.headless_ticks,
            render: !cli.no_render,
            autopilot: cli.autopilot,
        };
        headless::run(&settings, options)
    } else {
        app::run(settings, cli.autopilot)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    log::info!(
        "Jumpy-fish starting ({} mode)",
        if cli.headless { "headless" } else { "windowed" }
    );

    match play(&cli, settings) {
        Ok(summary) => {
            if cli.headless {
                println!(
                    "seed {} | ticks {} | score {}",
                    summary.seed, summary.ticks, summary.score
                );
            } else {
                println!("Final score: {}", summary.score);
            }
            ExitCode::SUCCESS
        }
        Err(RunError::Config(err)) => {
            let err = anyhow::Error::from(err).context("invalid settings");
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_CONFIG)
        }
        Err(RunError::Setup(err)) => {
            let hint = err.hint();
            let err = anyhow::Error::from(err);
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            eprintln!("hint: {hint}");
            ExitCode::from(EXIT_SETUP)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_headless_flags() {
        let cli = Cli::try_parse_from([
            "jumpy-fish",
            "--headless",
            "--ticks",
            "42",
            "--seed",
            "7",
            "--no-render",
            "--autopilot",
        ])
        .unwrap();
        assert!(cli.headless && cli.no_render && cli.autopilot);

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.headless_ticks, 42);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["jumpy-fish", "--config", "/no/such/settings.json"]).unwrap();
        assert!(load_settings(&cli).is_err());
    }

    #[test]
    fn test_headless_smoke_without_gpu() {
        let cli = Cli::try_parse_from(["jumpy-fish", "--headless", "--no-render", "--seed", "1"])
            .unwrap();
        let settings = load_settings(&cli).unwrap();
        let summary = play(&cli, settings).unwrap();
        assert_eq!(summary.ticks, 11);
    }
}
