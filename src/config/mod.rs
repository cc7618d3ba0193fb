use crate::errors::{AppError, AppResult};
use crate::models::Coordinate;
use crate::utils::date::parse_utc_offset;
use crate::utils::path::resolve_in;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Environment variable that overrides `bot_token`.
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bot API token; `TELEGRAM_TOKEN` takes precedence when set.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Administrator chat/user id. Absent means "not configured yet".
    #[serde(default)]
    pub admin_id: Option<i64>,
    #[serde(default = "default_target")]
    pub target: Coordinate,
    #[serde(default = "default_max_distance")]
    pub max_distance_meters: f64,
    #[serde(default = "default_records_file")]
    pub records_file: String,
    #[serde(default = "default_sessions_file")]
    pub sessions_file: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_export_interval")]
    pub export_interval_secs: u64,
    /// Absent means an open session never expires.
    #[serde(default)]
    pub session_timeout_secs: Option<u64>,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_target() -> Coordinate {
    Coordinate::new(33.311317, 44.330635)
}
fn default_max_distance() -> f64 {
    25.0
}
fn default_records_file() -> String {
    "attendance_records.csv".to_string()
}
fn default_sessions_file() -> String {
    "sessions.json".to_string()
}
fn default_utc_offset() -> String {
    "+03:00".to_string()
}
fn default_export_interval() -> u64 {
    600
}
fn default_poll_timeout() -> u64 {
    30
}
fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_id: None,
            target: default_target(),
            max_distance_meters: default_max_distance(),
            records_file: default_records_file(),
            sessions_file: default_sessions_file(),
            utc_offset: default_utc_offset(),
            export_interval_secs: default_export_interval(),
            session_timeout_secs: None,
            poll_timeout_secs: default_poll_timeout(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geoattend")
    }

    /// Return the full path of the default config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("geoattend.conf")
    }

    /// Load configuration from `path`, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    /// Load, apply environment overrides and validate.
    pub fn load_effective(path: &Path) -> AppResult<Self> {
        let mut cfg = Self::load(path)?;
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && !token.trim().is_empty()
        {
            cfg.bot_token = Some(token);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write a default configuration file at `path`, creating its directory.
    /// An existing file is left untouched; returns whether a file was written.
    pub fn init_all(path: &Path) -> AppResult<bool> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        if path.exists() {
            return Ok(false);
        }
        let yaml = serde_yaml::to_string(&Config::default())?;
        fs::write(path, yaml)?;
        Ok(true)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.target.is_valid() {
            return Err(AppError::Config(format!(
                "target {} is outside [-90,90] x [-180,180]",
                self.target
            )));
        }
        if !self.max_distance_meters.is_finite() || self.max_distance_meters < 0.0 {
            return Err(AppError::Config(format!(
                "max_distance_meters must be a non-negative number, got {}",
                self.max_distance_meters
            )));
        }
        if self.export_interval_secs == 0 {
            return Err(AppError::Config(
                "export_interval_secs must be greater than 0".into(),
            ));
        }
        self.offset()?;
        Ok(())
    }

    pub fn offset(&self) -> AppResult<FixedOffset> {
        parse_utc_offset(&self.utc_offset).ok_or_else(|| {
            AppError::Config(format!(
                "utc_offset '{}' is not a valid offset (expected e.g. +03:00)",
                self.utc_offset
            ))
        })
    }

    /// Relative file names are resolved next to the config file.
    pub fn records_path(&self, config_path: &Path) -> PathBuf {
        resolve_in(base_dir(config_path), &self.records_file)
    }

    pub fn sessions_path(&self, config_path: &Path) -> PathBuf {
        resolve_in(base_dir(config_path), &self.sessions_file)
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id == Some(user_id)
    }
}

fn base_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
