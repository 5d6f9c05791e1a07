//! Shadow Swap entry point.
//!
//! Two ways to run the simulation:
//!
//! - **headless** (default): feed a JSON input script through a fixed number
//!   of ticks and optionally print a JSON state line every N ticks.
//! - **window** (`--window`, needs the `window` feature): play with the
//!   keyboard in a raylib window.
//!
//! Tuning comes from `./config.ini` when present, or from `--config PATH`.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --script demos/switch.json --dump-state 30
//! cargo run --release --features window -- --window
//! ```

use clap::Parser;
use log::{error, info, warn};
use serde::Serialize;
use shadowswap::game::Simulation;
use shadowswap::resources::coordinator::CoordinatorState;
use shadowswap::resources::gameconfig::{ConfigError, GameConfig};
use shadowswap::resources::gamestate::GameSnapshot;
use shadowswap::resources::level::LevelLayout;
use shadowswap::resources::script::ScriptedInput;
use std::path::PathBuf;
use std::process::ExitCode;

/// Ticks simulated headless when neither `--ticks` nor a script says otherwise.
const DEFAULT_HEADLESS_TICKS: u64 = 600;

/// Shadow Swap: drive one body while the other follows.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Read tuning from this INI file instead of ./config.ini.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// JSON input script for the headless run.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Ticks to simulate headless. Defaults to the script length.
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Print a JSON state line every N ticks.
    #[arg(long, value_name = "N")]
    dump_state: Option<u64>,

    /// Open a window and play with the keyboard.
    #[cfg(feature = "window")]
    #[arg(long)]
    window: bool,
}

#[derive(Serialize)]
struct StateDump {
    tick: u64,
    snapshot: GameSnapshot,
    coordinator: CoordinatorState,
    debug: String,
}

fn load_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path.clone()),
        None => GameConfig::new(),
    };
    // An explicit path must exist; the default one is optional.
    if cli.config.is_some() || config.config_path.exists() {
        config.load_from_file()?;
    } else {
        info!("No {:?}, using default tuning", config.config_path);
    }
    Ok(config)
}

fn dump_state(sim: &Simulation) {
    let dump = StateDump {
        tick: sim.frame(),
        snapshot: sim.snapshot(),
        coordinator: sim.coordinator_state(),
        debug: sim.debug_line(),
    };
    match serde_json::to_string(&dump) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!("Could not serialize state: {e}"),
    }
}

fn run_headless(cli: &Cli, config: GameConfig) -> ExitCode {
    let input = match &cli.script {
        Some(path) => match ScriptedInput::from_file(path) {
            Ok(script) => script,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => ScriptedInput::default(),
    };
    let ticks = cli.ticks.unwrap_or(if input.is_empty() {
        DEFAULT_HEADLESS_TICKS
    } else {
        input.len() as u64
    });

    let mut sim = Simulation::new(config, LevelLayout::reference(), input);
    for _ in 0..ticks {
        sim.tick();
        if let Some(every) = cli.dump_state
            && every > 0
            && sim.frame() % every == 0
        {
            dump_state(&sim);
        }
    }
    info!(
        "Ran {} ticks, {} switches. {}",
        sim.frame(),
        sim.coordinator().switch_count(),
        sim.debug_line()
    );
    ExitCode::SUCCESS
}

#[cfg(feature = "window")]
fn run_window(cli: &Cli, config: &GameConfig) -> Option<ExitCode> {
    if !cli.window {
        return None;
    }
    shadowswap::frontend::run(config.clone());
    Some(ExitCode::SUCCESS)
}

#[cfg(not(feature = "window"))]
fn run_window(_cli: &Cli, _config: &GameConfig) -> Option<ExitCode> {
    None
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Early-exit: dump the effective config and quit
    if let Some(path) = &cli.write_config {
        return match config.save_to_file(path) {
            Ok(()) => {
                println!("Config written to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    if let Some(code) = run_window(&cli, &config) {
        return code;
    }
    run_headless(&cli, config)
}
