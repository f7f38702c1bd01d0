//! Deploy errors - Everything the orchestrator can report to its caller
//!
//! Errors are surfaced unmodified. Nothing in the domain retries.

use core::fmt;

use crate::model::record::Address;
use crate::model::version::Version;
use crate::repository::state_store::StoreError;

/// Errors that can occur while deploying or upgrading an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// No definition registered under this name
    UnknownArtifact { name: String },
    /// A definition with this name was already registered in this run
    DuplicateArtifact { name: String },
    /// The requested version is lower than the live one
    DowngradeRejected {
        name: String,
        current: Version,
        requested: Version,
    },
    /// The deployer failed a fresh deploy
    DeploymentFailed { name: String, reason: String },
    /// The deployer failed an upgrade
    UpgradeFailed {
        name: String,
        address: Address,
        reason: String,
    },
    /// A manually supplied address is blank
    InvalidAddress { name: String },
    /// The state store could not be read or written
    StateStoreIo { name: String, source: StoreError },
    /// The deployer may have changed the world but the store does not say so.
    /// An operator has to inspect the target and record the outcome.
    StateReconciliationRequired {
        name: String,
        address: Option<Address>,
        version: Version,
        reason: String,
    },
}

impl DeployError {
    /// Stable name of the error kind, printed by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            DeployError::UnknownArtifact { .. } => "UnknownArtifact",
            DeployError::DuplicateArtifact { .. } => "DuplicateArtifact",
            DeployError::DowngradeRejected { .. } => "DowngradeRejected",
            DeployError::DeploymentFailed { .. } => "DeploymentFailed",
            DeployError::UpgradeFailed { .. } => "UpgradeFailed",
            DeployError::InvalidAddress { .. } => "ConfigError",
            DeployError::StateStoreIo { .. } => "StateStoreIOError",
            DeployError::StateReconciliationRequired { .. } => "StateReconciliationRequired",
        }
    }

    /// Name of the artifact the error is about
    pub fn artifact_name(&self) -> &str {
        match self {
            DeployError::UnknownArtifact { name }
            | DeployError::DuplicateArtifact { name }
            | DeployError::DowngradeRejected { name, .. }
            | DeployError::DeploymentFailed { name, .. }
            | DeployError::UpgradeFailed { name, .. }
            | DeployError::InvalidAddress { name }
            | DeployError::StateStoreIo { name, .. }
            | DeployError::StateReconciliationRequired { name, .. } => name,
        }
    }
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::UnknownArtifact { name } => {
                write!(f, "Artifact '{}' is not registered", name)
            }
            DeployError::DuplicateArtifact { name } => {
                write!(f, "Artifact '{}' is already registered", name)
            }
            DeployError::DowngradeRejected {
                name,
                current,
                requested,
            } => write!(
                f,
                "Refusing to downgrade '{}' from {} to {}",
                name, current, requested
            ),
            DeployError::DeploymentFailed { name, reason } => {
                write!(f, "Deployment of '{}' failed: {}", name, reason)
            }
            DeployError::UpgradeFailed {
                name,
                address,
                reason,
            } => write!(f, "Upgrade of '{}' at {} failed: {}", name, address, reason),
            DeployError::InvalidAddress { name } => {
                write!(f, "Address for '{}' must not be empty", name)
            }
            DeployError::StateStoreIo { name, source } => {
                write!(f, "State store error for '{}': {}", name, source)
            }
            DeployError::StateReconciliationRequired {
                name,
                address,
                version,
                reason,
            } => {
                write!(f, "State of '{}' {} needs manual reconciliation", name, version)?;
                if let Some(address) = address {
                    write!(f, " (deployer reported address {})", address)?;
                }
                write!(f, ": {}", reason)
            }
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::StateStoreIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        let err = DeployError::StateStoreIo {
            name: "Token".into(),
            source: StoreError::Io {
                message: "disk full".into(),
            },
        };
        assert_eq!(err.kind(), "StateStoreIOError");
        assert_eq!(err.artifact_name(), "Token");

        let err = DeployError::UnknownArtifact { name: "Nope".into() };
        assert_eq!(err.kind(), "UnknownArtifact");
    }

    #[test]
    fn test_reconciliation_message_includes_address() {
        let err = DeployError::StateReconciliationRequired {
            name: "Token".into(),
            address: Some(Address::new("0xabc")),
            version: Version::new(1, 1, 0),
            reason: "state write failed".into(),
        };
        let text = err.to_string();
        assert!(text.contains("0xabc"));
        assert!(text.contains("1.1.0"));
    }

    #[test]
    fn test_reconciliation_message_without_address() {
        let err = DeployError::StateReconciliationRequired {
            name: "Token".into(),
            address: None,
            version: Version::new(1, 1, 0),
            reason: "outcome unknown".into(),
        };
        assert!(!err.to_string().contains("reported address"));
    }

    #[test]
    fn test_invalid_address_is_a_config_error() {
        let err = DeployError::InvalidAddress { name: "Token".into() };
        assert_eq!(err.kind(), "ConfigError");
        assert_eq!(err.artifact_name(), "Token");
    }
}
