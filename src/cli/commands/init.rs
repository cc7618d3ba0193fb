use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::path::Path;

/// Handle the `init` command
///
/// Creates the config directory and a default configuration file. An
/// existing file is never overwritten.
pub fn handle(config_path: &Path) -> AppResult<()> {
    if Config::init_all(config_path)? {
        success(format!("Config file: {}", config_path.display()));
    } else {
        info(format!(
            "Config file already exists: {}",
            config_path.display()
        ));
    }

    let cfg = Config::load(config_path)?;
    info(format!("Records file: {}", cfg.records_path(config_path).display()));
    info("Set admin_id and bot_token (or TELEGRAM_TOKEN) before running the bot.");
    Ok(())
}
