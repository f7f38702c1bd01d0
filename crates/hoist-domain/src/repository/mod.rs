//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define HOW the domain wants to look up definitions and
//! persist records, but NOT how it's actually done. That's the adapter's job.
//!
//! ```text
//! Domain Layer               │  Adapter Layer
//! ───────────────────────────┼────────────────────────
//! trait ArtifactRegistry     │  InMemoryArtifactRegistry
//! trait DeploymentStateStore │  InMemoryStateStore
//!   fn current()             │  JsonFileStateStore
//!   fn set_current()         │
//! ```

pub mod artifact_registry;
pub mod state_store;
