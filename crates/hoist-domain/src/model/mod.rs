//! Domain Models - The vocabulary of Hoist
//!
//! These types represent the "Ubiquitous Language" of deployments.
//! Every name here should match how we talk about the system.

pub mod artifact;
pub mod record;
pub mod version;
