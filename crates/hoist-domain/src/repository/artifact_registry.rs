//! Artifact Registry - Definitions known to this run
//!
//! Process-scoped: every run starts empty and registers what the
//! configuration names.

use crate::error::DeployError;
use crate::model::artifact::ArtifactDefinition;

/// Artifact Registry Trait
///
/// This is a PORT in hexagonal architecture.
pub trait ArtifactRegistry {
    /// Register a definition; fails with `DuplicateArtifact` on a repeated name
    fn register(&mut self, definition: ArtifactDefinition) -> Result<(), DeployError>;

    /// Find a definition by name; fails with `UnknownArtifact`
    fn lookup(&self, name: &str) -> Result<ArtifactDefinition, DeployError>;

    /// All definitions in registration order
    fn definitions(&self) -> Vec<ArtifactDefinition>;

    /// Check if a name is registered
    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }
}
