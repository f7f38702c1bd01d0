//! Deployer - The external collaborator that actually deploys things
//!
//! The domain only decides. Creating instances and pointing proxies at new
//! logic is delegated to whatever SDK sits behind this trait.

use core::fmt;
use core::time::Duration;

use crate::model::artifact::{ArtifactDefinition, InitArg};
use crate::model::record::Address;

/// Errors a deployer can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployerError {
    /// The deployer ran and reported failure; nothing was changed
    Failed { reason: String },
    /// The deployer did not answer in time; the outcome is unknown
    TimedOut { after: Duration },
}

impl fmt::Display for DeployerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployerError::Failed { reason } => f.write_str(reason),
            DeployerError::TimedOut { after } => {
                write!(f, "deployer did not finish within {:?}", after)
            }
        }
    }
}

impl std::error::Error for DeployerError {}

/// Deployer Trait
///
/// This is a PORT in hexagonal architecture. Calls are atomic from the
/// orchestrator's point of view; if the underlying SDK is asynchronous,
/// the adapter blocks on it.
pub trait Deployer {
    /// Create a new instance and run its initializer; returns its address
    fn deploy_fresh(
        &self,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError>;

    /// Point the instance at `address` to the new logic; returns the
    /// address callers should use afterwards (usually unchanged)
    fn upgrade_in_place(
        &self,
        address: &Address,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError>;
}
