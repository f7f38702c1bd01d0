//! # Hoist Use Case Layer
//!
//! Application-specific business rules.
//! This layer turns configuration into registered definitions, drives the
//! orchestrator and shapes its results for display.

pub mod catalog;
pub mod deploy;
pub mod report;

pub use hoist_domain;

pub use catalog::{definition_from_config, init_arg_from_json, register_catalog, CatalogError};
pub use deploy::{deploy, history, plan, reconcile, status};
pub use report::{format_timestamp, HistoryReport, OutcomeReport, PlanReport, RecordView, StatusRow};
