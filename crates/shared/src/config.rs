//! Configuration types for Hoist
//!
//! The configuration file names the artifacts to deploy, their versions and
//! initializer arguments, where state lives and which deployer to call.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{HoistError, Result};

/// Environment variable holding the configuration file path
pub const CONFIG_ENV_VAR: &str = "HOIST_CONFIG";

const DEFAULT_STATE_FILE: &str = ".hoist/state.json";

fn artifact_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("artifact name pattern is valid")
    })
}

/// Which collaborator performs deploys and upgrades
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeployerConfig {
    /// Local stand-in that mints addresses without touching anything
    #[default]
    Simulated,

    /// External SDK helper run as a child process
    #[serde(rename_all = "camelCase")]
    Command {
        /// Command to execute
        command: String,

        /// Command line arguments placed before the action
        #[serde(default)]
        args: Vec<String>,

        /// Environment variables
        #[serde(default)]
        env: HashMap<String, String>,

        /// Give up waiting after this many seconds
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

/// One deployable artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactConfig {
    pub name: String,

    /// Semantic version, e.g. `1.2.0`
    pub version: String,

    /// Initializer entry point; the deployer's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,

    /// Initializer arguments, in order
    #[serde(default)]
    pub init_args: Vec<serde_json::Value>,
}

/// Hoist configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoistConfig {
    /// Where deployment state is kept; relative to the config file
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default)]
    pub deployer: DeployerConfig,

    #[serde(default)]
    pub artifacts: Vec<ArtifactConfig>,

    /// Directory of the file this was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

impl HoistConfig {
    /// Load configuration from a YAML (`.yaml`/`.yml`) or JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HoistError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let mut config: Self = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.base_dir = path.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the file named by `HOIST_CONFIG`
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR).ok_or(HoistError::MissingEnv(CONFIG_ENV_VAR))?;
        Self::from_file(Path::new(&path))
    }

    /// Load from an explicit path when given, from the environment otherwise
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// Absolute (or caller-relative) path of the state file
    pub fn state_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) if self.state_file.is_relative() => base.join(&self.state_file),
            _ => self.state_file.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        for artifact in &self.artifacts {
            if !artifact_name_pattern().is_match(&artifact.name) {
                return Err(HoistError::Config(format!(
                    "invalid artifact name '{}': use letters, digits, '_', '-' or '.'",
                    artifact.name
                )));
            }
            if artifact.version.trim().is_empty() {
                return Err(HoistError::Config(format!(
                    "artifact '{}' has no version",
                    artifact.name
                )));
            }
        }

        if let DeployerConfig::Command { command, .. } = &self.deployer {
            if command.trim().is_empty() {
                return Err(HoistError::Config("deployer command is empty".to_string()));
            }
        }

        Ok(())
    }
}
