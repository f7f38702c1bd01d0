//! Deployment State Store - Abstract persistence for deployment records
//!
//! One current record per artifact name, plus an append-only log of the
//! records it replaced. How it's stored (memory, file, table) is not our
//! concern here.

use core::fmt;
use std::sync::Arc;

use crate::model::record::DeploymentRecord;
use crate::model::version::Version;

/// Errors that can occur during state store operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing storage failed
    Io { message: String },
    /// The backing storage holds data we cannot interpret
    Corrupt { message: String },
    /// The write would make the lineage's version go backwards
    NonMonotonic {
        name: String,
        current: Version,
        attempted: Version,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { message } => write!(f, "I/O error: {}", message),
            StoreError::Corrupt { message } => write!(f, "Corrupt state: {}", message),
            StoreError::NonMonotonic {
                name,
                current,
                attempted,
            } => write!(
                f,
                "Version of '{}' cannot move from {} back to {}",
                name, current, attempted
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Snapshot of an artifact's lineage, oldest first, current record last
///
/// Iterating never touches the store again, and `iter()` can be called
/// any number of times.
#[derive(Debug, Clone)]
pub struct History {
    records: Arc<[DeploymentRecord]>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl History {
    pub fn new(records: Vec<DeploymentRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, DeploymentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The current record, if the artifact was ever deployed
    pub fn latest(&self) -> Option<&DeploymentRecord> {
        self.records.last()
    }

    /// Versions never decrease from one entry to the next
    pub fn is_monotonic(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].version() <= pair[1].version())
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a DeploymentRecord;
    type IntoIter = core::slice::Iter<'a, DeploymentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Deployment State Store Trait
///
/// This is a PORT in hexagonal architecture.
/// Methods take `&self`: implementations serialize writes per artifact
/// name internally so different names can be written in parallel.
pub trait DeploymentStateStore {
    /// The current record, or `None` when the artifact was never deployed
    fn current(&self, name: &str) -> Result<Option<DeploymentRecord>, StoreError>;

    /// Make `record` current for its artifact name and archive the previous
    /// current record, all or nothing. Rejects versions lower than current.
    fn set_current(&self, record: DeploymentRecord) -> Result<(), StoreError>;

    /// The whole lineage of `name`, oldest first
    fn history(&self, name: &str) -> Result<History, StoreError>;

    /// Names that have a current record, sorted
    fn artifact_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Check shared by all store implementations before a write
pub fn ensure_monotonic(
    current: Option<&DeploymentRecord>,
    next: &DeploymentRecord,
) -> Result<(), StoreError> {
    match current {
        Some(current) if next.version() < current.version() => Err(StoreError::NonMonotonic {
            name: next.artifact_name().to_string(),
            current: current.version().clone(),
            attempted: next.version().clone(),
        }),
        _ => Ok(()),
    }
}
