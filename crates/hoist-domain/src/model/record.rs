//! DeploymentRecord - The stored fact that a version is live at an address

use core::fmt;

use super::version::Version;

/// Opaque instance identifier returned by the deployer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

/// DeploymentRecord - one entry of an artifact's lineage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    artifact_name: String,
    address: Address,
    version: Version,
    deployed_at: Timestamp,
}

impl DeploymentRecord {
    pub fn new(
        artifact_name: impl Into<String>,
        address: Address,
        version: Version,
        deployed_at: Timestamp,
    ) -> Self {
        Self {
            artifact_name: artifact_name.into(),
            address,
            version,
            deployed_at,
        }
    }

    pub fn artifact_name(&self) -> &str {
        &self.artifact_name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn deployed_at(&self) -> Timestamp {
        self.deployed_at
    }
}

impl fmt::Display for DeploymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.artifact_name, self.version, self.address)
    }
}
