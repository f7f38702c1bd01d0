//! # Hoist Shared
//!
//! Configuration file model and error types used across all Hoist crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
