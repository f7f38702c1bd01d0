//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from hoist-domain.

pub mod in_memory;
pub mod json_file;
