//! Catalog - Configuration entries to registered artifact definitions

use hoist_domain::{
    ArtifactDefinition, ArtifactRegistry, DeployError, InitArg, Version, VersionParseError,
};
use serde_json::Value;
use shared::{ArtifactConfig, HoistConfig};
use thiserror::Error;
use tracing::debug;

/// Errors raised while building the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Artifact '{name}': {source}")]
    InvalidVersion {
        name: String,
        #[source]
        source: VersionParseError,
    },

    #[error("Artifact '{name}': init argument {index} {reason}")]
    InvalidInitArg {
        name: String,
        index: usize,
        reason: String,
    },

    #[error(transparent)]
    Registry(#[from] DeployError),
}

impl CatalogError {
    /// Stable name of the error kind, printed by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Registry(e) => e.kind(),
            _ => "ConfigError",
        }
    }
}

/// Convert one JSON/YAML value into a typed init argument
pub fn init_arg_from_json(value: &Value) -> Result<InitArg, String> {
    match value {
        Value::Bool(b) => Ok(InitArg::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(InitArg::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(InitArg::Uint(u))
            } else {
                Err(format!("is not an integer: {}", n))
            }
        }
        Value::String(s) => Ok(InitArg::Text(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(init_arg_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(InitArg::List),
        Value::Null => Err("is null".to_string()),
        Value::Object(_) => Err("is an object; only scalars and lists are supported".to_string()),
    }
}

/// Build a definition from its configuration entry
pub fn definition_from_config(artifact: &ArtifactConfig) -> Result<ArtifactDefinition, CatalogError> {
    let version = Version::parse(&artifact.version).map_err(|source| CatalogError::InvalidVersion {
        name: artifact.name.clone(),
        source,
    })?;

    let init_args = artifact
        .init_args
        .iter()
        .enumerate()
        .map(|(index, value)| {
            init_arg_from_json(value).map_err(|reason| CatalogError::InvalidInitArg {
                name: artifact.name.clone(),
                index,
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut definition = ArtifactDefinition::new(&artifact.name, version).with_init_args(init_args);
    if let Some(initializer) = &artifact.initializer {
        definition = definition.with_initializer(initializer);
    }
    Ok(definition)
}

/// Register every artifact of the configuration; returns how many
pub fn register_catalog<R: ArtifactRegistry>(
    config: &HoistConfig,
    registry: &mut R,
) -> Result<usize, CatalogError> {
    for artifact in &config.artifacts {
        let definition = definition_from_config(artifact)?;
        debug!(artifact = %definition.name(), version = %definition.version(), "registering artifact");
        registry.register(definition)?;
    }
    Ok(config.artifacts.len())
}
