//! # Hoist CLI
//!
//! Command handlers, wiring and exit-code mapping for the `hoist` binary.

pub mod commands;
pub mod context;
pub mod exit;
