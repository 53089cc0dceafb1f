use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::filter::{CategoryFilter, ALL_CATEGORIES};
use crate::hotkey::{validate_hotkey, DEFAULT_SEARCH_HOTKEY};
use crate::progress::{DEFAULT_STEP, DEFAULT_TICK_INTERVAL};

pub const APP_DIR_NAME: &str = "devtools-showcase";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hotkey: String,
    pub progress_step: u8,
    pub tick_interval_ms: u64,
    pub default_category: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_SEARCH_HOTKEY.to_string(),
            progress_step: DEFAULT_STEP,
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            default_category: ALL_CATEGORIES.to_string(),
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
    Serialize(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse(error) => write!(f, "parse error: {error}"),
            Self::Serialize(error) => write!(f, "serialize error: {error}"),
            Self::Invalid(error) => write!(f, "invalid config: {error}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    let base = std::env::var_os("APPDATA")
        .or_else(|| std::env::var_os("XDG_CONFIG_HOME"))
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(std::env::temp_dir);
    base.join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

/// Loads config from `path` (or the default location). A missing file is
/// not an error and yields defaults bound to that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    let mut config = if config_path.exists() {
        let raw = fs::read_to_string(&config_path)?;
        parse(&raw)?
    } else {
        Config::default()
    };
    config.config_path = config_path;

    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn parse(raw: &str) -> Result<Config, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(Config::default());
    }
    json5::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    validate(config).map_err(ConfigError::Invalid)?;
    if let Some(parent) = config.config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let body =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    fs::write(&config.config_path, body)?;
    Ok(())
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    validate_hotkey(&cfg.hotkey)?;

    if !(1..=100).contains(&cfg.progress_step) {
        return Err("progress_step must be between 1 and 100".into());
    }

    if !(10..=5_000).contains(&cfg.tick_interval_ms) {
        return Err("tick_interval_ms must be between 10 and 5000".into());
    }

    if let CategoryFilter::Unknown(raw) = CategoryFilter::parse(&cfg.default_category) {
        return Err(format!("default_category '{raw}' is not a known category"));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}
