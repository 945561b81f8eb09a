use anyhow::{anyhow, Result};
use log::{info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;

use crate::reply::DEFAULT_DELAY_MS;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    /// Randomized reply-delay window in milliseconds, min inclusive and max
    /// exclusive.
    #[serde(default = "default_delay")]
    pub reply_delay_ms: (u64, u64),
    /// Whether simulated replies raise desktop notifications.
    #[serde(default = "default_notifications")]
    pub notifications: bool,
    /// Log level filter: error, warn, info, debug, or trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_delay() -> (u64, u64) {
    DEFAULT_DELAY_MS
}

fn default_notifications() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            reply_delay_ms: default_delay(),
            notifications: default_notifications(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Clamp nonsense delay windows back to the default rather than letting
    /// `gen_range` panic on an empty range later.
    pub fn validated(mut self) -> Self {
        let (min, max) = self.reply_delay_ms;
        if min >= max {
            warn!(
                "invalid reply delay window [{}, {}), falling back to default",
                min, max
            );
            self.reply_delay_ms = DEFAULT_DELAY_MS;
        }
        self
    }

    /// Apply `BANTER_*` environment overrides on top of whatever was loaded.
    pub fn with_env_overrides(mut self) -> Self {
        if std::env::var("BANTER_NO_NOTIFY").is_ok() {
            self.notifications = false;
        }
        if let Ok(level) = std::env::var("BANTER_LOG_LEVEL") {
            self.log_level = level;
        }
        self
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("banter");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn save_config(config: &Config) -> Result<()> {
    let config_path = get_config_path()?;
    let file = File::create(&config_path)?;
    serde_json::to_writer_pretty(file, config)?;

    info!("Config saved to {}", config_path.display());
    Ok(())
}

/// Load the config file, or fall back to (and persist) the defaults when no
/// file exists yet.
pub fn load_config() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        let config = Config::default();
        if let Err(e) = save_config(&config) {
            warn!("Failed to write default config: {}", e);
        }
        return Ok(config);
    }

    let mut file = File::open(&config_path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let config: Config = serde_json::from_str(&contents)?;
    info!("Loaded config from {}", config_path.display());

    Ok(config)
}

static CONFIG_PATH_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Point the config loader at an explicit file (from `--config`). Only the
/// first call wins.
pub fn set_config_path_override(path: PathBuf) {
    let _ = CONFIG_PATH_OVERRIDE.set(path);
}

fn get_config_path() -> Result<PathBuf> {
    if let Some(path) = CONFIG_PATH_OVERRIDE.get() {
        return Ok(path.clone());
    }
    Ok(get_config_dir()?.join("config.json"))
}
