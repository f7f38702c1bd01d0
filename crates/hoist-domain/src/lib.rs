//! # Hoist Domain Layer
//!
//! The heart of Hoist - deploy-or-upgrade decisions with zero external
//! dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Version, ArtifactDefinition, DeploymentRecord ││
//! │  │  repository/- Registry & state store ports                  ││
//! │  │  service/   - Orchestrator, Deployer port, Clock            ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **This crate has ZERO external dependencies.**
//!
//! If the deployment SDK changes, this crate doesn't change.
//! If records move from a JSON file to a database, this crate doesn't change.

pub mod error;
pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::DeployError;

pub use model::{
    artifact::{ArtifactDefinition, InitArg, DEFAULT_INITIALIZER},
    record::{Address, DeploymentRecord, Timestamp},
    version::{Version, VersionParseError},
};

pub use repository::{
    artifact_registry::ArtifactRegistry,
    state_store::{ensure_monotonic, DeploymentStateStore, History, StoreError},
};

pub use service::{
    clock::{Clock, SystemClock},
    deployer::{Deployer, DeployerError},
    orchestrator::{DeployOutcome, Orchestrator, Plan},
};
