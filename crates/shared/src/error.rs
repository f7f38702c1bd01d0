//! Error types for Hoist configuration and IO

use std::path::PathBuf;
use thiserror::Error;

/// Error thrown when the configuration cannot be located, read or understood
#[derive(Debug, Error)]
pub enum HoistError {
    #[error("Environment variable {0} is not set; point it at a hoist configuration file")]
    MissingEnv(&'static str),

    #[error("Cannot read configuration file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl HoistError {
    /// Stable name of the error kind, printed by the CLI
    pub fn kind(&self) -> &'static str {
        "ConfigError"
    }
}

pub type Result<T> = std::result::Result<T, HoistError>;
