use crate::cli::OutputFormat;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "sbconnect";
const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "SBCONNECT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration loading failed: {0}. Please check your config file and environment variables.")]
    Load(String),

    #[error("Failed to deserialize config: {0}")]
    Deserialize(String),
}

/// Inspector configuration, layered from an optional TOML file and
/// `SBCONNECT__*` environment variables (environment wins).
#[derive(Debug, Default, Deserialize)]
pub struct InspectConfig {
    connection_string: Option<String>,
    #[serde(default)]
    format: OutputFormat,
    #[serde(default)]
    logging: LoggingConfig,
}

impl InspectConfig {
    pub fn connection_string(&self) -> Option<&str> {
        self.connection_string.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("warn")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

/// Default location of the configuration file, if the platform has a user
/// configuration directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads configuration from `path` (or the default location) and the
/// environment. A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<InspectConfig, ConfigLoadError> {
    dotenv::dotenv().ok();

    let mut builder = Config::builder();
    if let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) {
        builder = builder.add_source(File::from(path).required(false));
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| ConfigLoadError::Load(e.to_string()))?;

    config
        .try_deserialize::<InspectConfig>()
        .map_err(|e| ConfigLoadError::Deserialize(e.to_string()))
}
