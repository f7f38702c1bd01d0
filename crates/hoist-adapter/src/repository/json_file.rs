//! JSON File State Store - Deployment state persisted on disk
//!
//! Layout:
//!
//! ```json
//! {
//!   "formatVersion": 1,
//!   "artifacts": {
//!     "Token": { "current": { ... }, "history": [ ... ] }
//!   }
//! }
//! ```
//!
//! Every write goes to a temporary file in the same directory which is
//! synced and then renamed over the target, so a reader sees either the
//! old document or the new one.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use hoist_domain::{
    ensure_monotonic, Address, DeploymentRecord, DeploymentStateStore, History, StoreError,
    Timestamp, Version,
};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordDto {
    artifact_name: String,
    address: String,
    version: String,
    deployed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineageDto {
    current: RecordDto,
    #[serde(default)]
    history: Vec<RecordDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDocument {
    format_version: u32,
    #[serde(default)]
    artifacts: BTreeMap<String, LineageDto>,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            artifacts: BTreeMap::new(),
        }
    }
}

impl TryFrom<&DeploymentRecord> for RecordDto {
    type Error = StoreError;

    fn try_from(record: &DeploymentRecord) -> Result<Self, Self::Error> {
        let millis = record.deployed_at().as_millis();
        let deployed_at =
            DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| StoreError::Io {
                message: format!(
                    "cannot record '{}': timestamp {}ms is out of range",
                    record.artifact_name(),
                    millis
                ),
            })?;
        Ok(Self {
            artifact_name: record.artifact_name().to_string(),
            address: record.address().to_string(),
            version: record.version().to_string(),
            deployed_at,
        })
    }
}

impl TryFrom<&RecordDto> for DeploymentRecord {
    type Error = StoreError;

    fn try_from(dto: &RecordDto) -> Result<Self, Self::Error> {
        let version = Version::parse(&dto.version).map_err(|e| StoreError::Corrupt {
            message: format!("record of '{}': {}", dto.artifact_name, e),
        })?;
        Ok(DeploymentRecord::new(
            dto.artifact_name.clone(),
            Address::new(dto.address.clone()),
            version,
            Timestamp::from_millis(dto.deployed_at.timestamp_millis()),
        ))
    }
}

fn io_error(path: &Path, action: &str, e: impl std::fmt::Display) -> StoreError {
    StoreError::Io {
        message: format!("cannot {} {}: {}", action, path.display(), e),
    }
}

/// Deployment State Store backed by one JSON document
///
/// Reads always go to disk, so records written by other processes are
/// seen. Writes within this process are serialized.
#[derive(Debug)]
pub struct JsonFileStateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStateStore {
    /// Use `path` as the state file; it is created on the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StateDocument, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StateDocument::default())
            }
            Err(e) => return Err(io_error(&self.path, "read", e)),
        };

        let document: StateDocument =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                message: format!("{}: {}", self.path.display(), e),
            })?;

        if document.format_version != FORMAT_VERSION {
            return Err(StoreError::Corrupt {
                message: format!(
                    "{}: unsupported formatVersion {} (expected {})",
                    self.path.display(),
                    document.format_version,
                    FORMAT_VERSION
                ),
            });
        }
        Ok(document)
    }

    fn save(&self, document: &StateDocument) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| io_error(&dir, "create", e))?;

        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StoreError::Io {
            message: format!("cannot encode state: {}", e),
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| io_error(&dir, "write in", e))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| io_error(tmp.path(), "write", e))?;
        tmp.persist(&self.path)
            .map_err(|e| io_error(&self.path, "replace", e.error))?;

        // Make the rename itself durable
        #[cfg(unix)]
        std::fs::File::open(&dir)
            .and_then(|d| d.sync_all())
            .map_err(|e| io_error(&dir, "sync", e))?;

        debug!(path = %self.path.display(), "state written");
        Ok(())
    }
}

impl DeploymentStateStore for JsonFileStateStore {
    fn current(&self, name: &str) -> Result<Option<DeploymentRecord>, StoreError> {
        let document = self.load()?;
        document
            .artifacts
            .get(name)
            .map(|lineage| DeploymentRecord::try_from(&lineage.current))
            .transpose()
    }

    fn set_current(&self, record: DeploymentRecord) -> Result<(), StoreError> {
        let _held = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.load()?;

        let name = record.artifact_name().to_string();
        let next = RecordDto::try_from(&record)?;
        match document.artifacts.get_mut(&name) {
            Some(lineage) => {
                let current = DeploymentRecord::try_from(&lineage.current)?;
                ensure_monotonic(Some(&current), &record)?;
                let previous = std::mem::replace(&mut lineage.current, next);
                lineage.history.push(previous);
            }
            None => {
                document.artifacts.insert(
                    name,
                    LineageDto {
                        current: next,
                        history: Vec::new(),
                    },
                );
            }
        }

        self.save(&document)
    }

    fn history(&self, name: &str) -> Result<History, StoreError> {
        let document = self.load()?;
        let Some(lineage) = document.artifacts.get(name) else {
            return Ok(History::default());
        };

        let records = lineage
            .history
            .iter()
            .chain(std::iter::once(&lineage.current))
            .map(DeploymentRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(History::new(records))
    }

    fn artifact_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load()?.artifacts.into_keys().collect())
    }
}
