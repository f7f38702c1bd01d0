//! In-Memory Repository Implementations
//!
//! The registry always lives in memory (it is rebuilt every run). The
//! in-memory state store is for tests and dry runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use hoist_domain::{
    ensure_monotonic, ArtifactDefinition, ArtifactRegistry, DeployError, DeploymentRecord,
    DeploymentStateStore, History, StoreError,
};

/// In-memory Artifact Registry
///
/// Keeps registration order for listing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactRegistry {
    definitions: Vec<ArtifactDefinition>,
    index: HashMap<String, usize>,
}

impl InMemoryArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ArtifactRegistry for InMemoryArtifactRegistry {
    fn register(&mut self, definition: ArtifactDefinition) -> Result<(), DeployError> {
        if self.index.contains_key(definition.name()) {
            return Err(DeployError::DuplicateArtifact {
                name: definition.name().to_string(),
            });
        }
        self.index
            .insert(definition.name().to_string(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<ArtifactDefinition, DeployError> {
        self.index
            .get(name)
            .map(|&i| self.definitions[i].clone())
            .ok_or_else(|| DeployError::UnknownArtifact {
                name: name.to_string(),
            })
    }

    fn definitions(&self) -> Vec<ArtifactDefinition> {
        self.definitions.clone()
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

#[derive(Debug, Default)]
struct Lineage {
    current: Option<DeploymentRecord>,
    archived: Vec<DeploymentRecord>,
}

/// In-memory Deployment State Store
///
/// Thread-safe, with one lock per artifact name so writes to different
/// names never wait on each other. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    lineages: Arc<RwLock<HashMap<String, Arc<Mutex<Lineage>>>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing(&self, name: &str) -> Result<Option<Arc<Mutex<Lineage>>>, StoreError> {
        let lineages = self.lineages.read().map_err(|_| StoreError::Io {
            message: "Failed to acquire read lock".to_string(),
        })?;
        Ok(lineages.get(name).cloned())
    }

    fn get_or_create(&self, name: &str) -> Result<Arc<Mutex<Lineage>>, StoreError> {
        if let Some(lineage) = self.existing(name)? {
            return Ok(lineage);
        }
        let mut lineages = self.lineages.write().map_err(|_| StoreError::Io {
            message: "Failed to acquire write lock".to_string(),
        })?;
        Ok(lineages.entry(name.to_string()).or_default().clone())
    }
}

fn lock_lineage(lineage: &Mutex<Lineage>) -> Result<std::sync::MutexGuard<'_, Lineage>, StoreError> {
    lineage.lock().map_err(|_| StoreError::Io {
        message: "Failed to acquire lineage lock".to_string(),
    })
}

impl DeploymentStateStore for InMemoryStateStore {
    fn current(&self, name: &str) -> Result<Option<DeploymentRecord>, StoreError> {
        match self.existing(name)? {
            Some(lineage) => Ok(lock_lineage(&lineage)?.current.clone()),
            None => Ok(None),
        }
    }

    fn set_current(&self, record: DeploymentRecord) -> Result<(), StoreError> {
        let lineage = self.get_or_create(record.artifact_name())?;
        let mut lineage = lock_lineage(&lineage)?;

        ensure_monotonic(lineage.current.as_ref(), &record)?;
        if let Some(previous) = lineage.current.replace(record) {
            lineage.archived.push(previous);
        }
        Ok(())
    }

    fn history(&self, name: &str) -> Result<History, StoreError> {
        let Some(lineage) = self.existing(name)? else {
            return Ok(History::default());
        };
        let lineage = lock_lineage(&lineage)?;

        let mut records = lineage.archived.clone();
        records.extend(lineage.current.clone());
        Ok(History::new(records))
    }

    fn artifact_names(&self) -> Result<Vec<String>, StoreError> {
        let lineages = self.lineages.read().map_err(|_| StoreError::Io {
            message: "Failed to acquire read lock".to_string(),
        })?;

        let mut names = Vec::new();
        for (name, lineage) in lineages.iter() {
            if lock_lineage(lineage)?.current.is_some() {
                names.push(name.clone());
            }
        }
        names.sort();
        Ok(names)
    }
}
