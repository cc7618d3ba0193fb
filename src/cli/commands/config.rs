use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{migrate_config, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, config_path: &Path) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
    } = cmd
    {
        // ---- PRINT CONFIG ----
        if *print_config {
            // never echo the token
            let mut shown = cfg.clone();
            if shown.bot_token.is_some() {
                shown.bot_token = Some("********".to_string());
            }
            println!("📄 Current configuration ({}):\n", config_path.display());
            println!("{}", serde_yaml::to_string(&shown)?);
        }

        if (*check || *migrate) && !config_path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist, run `geoattend init` first",
                config_path.display()
            )));
        }

        // ---- CHECK ----
        if *check {
            let missing = missing_keys(config_path)?;
            if missing.is_empty() {
                success("Configuration file is complete.");
            } else {
                warning(format!("Missing keys: {}", missing.join(", ")));
            }
        }

        // ---- MIGRATE ----
        if *migrate {
            let added = migrate_config(config_path)?;
            if added.is_empty() {
                success("Configuration file already up to date.");
            } else {
                success(format!("Added keys: {}", added.join(", ")));
            }
        }
    }

    Ok(())
}
