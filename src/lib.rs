//! geoattend library root.
//! Exposes the CLI parser, the high-level run() function, and the bot modules.

pub mod bot;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod geo;
pub mod models;
pub mod store;
pub mod telemetry;
pub mod transport;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::{Path, PathBuf};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, config_path: &Path) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(config_path),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, config_path),
        Commands::Run => cli::commands::run::handle(cfg, config_path),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg, config_path),
        Commands::Distance { .. } => cli::commands::distance::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ resolve the config file (--config wins over the default location)
    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_file);

    // 3️⃣ `init` must work before any config exists
    if matches!(cli.command, Commands::Init) {
        return dispatch(&cli, &Config::default(), &config_path);
    }

    // 4️⃣ load config ONCE, with env overrides, and hand it down
    let cfg = Config::load_effective(&config_path)?;
    dispatch(&cli, &cfg, &config_path)
}
