use std::collections::BTreeMap;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "cubby";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Bearer tokens accepted by the API, mapped to the email they identify
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

fn default_api_port() -> u16 {
    5050
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            tokens: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the cubby directory (~/.cubby)
    pub cubby_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the cubby directory path (custom or default ~/.cubby)
    pub fn cubby_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new cubby state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let cubby_dir = Self::cubby_dir(custom_path)?;

        if cubby_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&cubby_dir)?;

        let config = config.unwrap_or_default();
        let config_path = cubby_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (just touch the file, it will be initialized by the service)
        let db_path = cubby_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            cubby_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the cubby directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let cubby_dir = Self::cubby_dir(custom_path)?;

        if !cubby_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = cubby_dir.join(DB_FILE_NAME);
        let config_path = cubby_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            cubby_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("cubby directory not initialized. Run 'cubby init' first")]
    NotInitialized,

    #[error("cubby directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
