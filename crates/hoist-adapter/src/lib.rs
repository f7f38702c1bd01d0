//! # Hoist Adapter Layer
//!
//! External system integrations (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `gateway/` - Outbound adapters (deployer SDK bridges)
//! - `repository/` - Registry and state store implementations

pub mod gateway;
pub mod repository;

pub use gateway::{command::CommandDeployer, simulated::SimulatedDeployer};
pub use repository::{
    in_memory::{InMemoryArtifactRegistry, InMemoryStateStore},
    json_file::JsonFileStateStore,
};
