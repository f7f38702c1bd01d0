//! Reports - Serializable views of records and outcomes
//!
//! The CLI prints these either as one-line summaries or as JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use hoist_domain::{DeployOutcome, DeploymentRecord, History, Plan, Timestamp};
use serde::Serialize;

/// RFC 3339 rendering of a domain timestamp
pub fn format_timestamp(timestamp: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp.as_millis())
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| timestamp.as_millis().to_string())
}

/// A deployment record as shown to people and scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub artifact_name: String,
    pub address: String,
    pub version: String,
    pub deployed_at: String,
}

impl From<&DeploymentRecord> for RecordView {
    fn from(record: &DeploymentRecord) -> Self {
        Self {
            artifact_name: record.artifact_name().to_string(),
            address: record.address().to_string(),
            version: record.version().to_string(),
            deployed_at: format_timestamp(record.deployed_at()),
        }
    }
}

/// Result of `hoist deploy`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeReport {
    /// `deployed`, `upgraded` or `unchanged`
    pub action: &'static str,
    pub record: RecordView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<RecordView>,
}

impl From<&DeployOutcome> for OutcomeReport {
    fn from(outcome: &DeployOutcome) -> Self {
        match outcome {
            DeployOutcome::Deployed { record } => Self {
                action: "deployed",
                record: record.into(),
                previous: None,
            },
            DeployOutcome::Upgraded { previous, record } => Self {
                action: "upgraded",
                record: record.into(),
                previous: Some(previous.into()),
            },
            DeployOutcome::Unchanged { record } => Self {
                action: "unchanged",
                record: record.into(),
                previous: None,
            },
        }
    }
}

impl OutcomeReport {
    /// One-line human summary
    pub fn headline(&self) -> String {
        let r = &self.record;
        match (self.action, &self.previous) {
            ("upgraded", Some(prev)) => format!(
                "Upgraded {} {} -> {} at {}",
                r.artifact_name, prev.version, r.version, r.address
            ),
            ("unchanged", _) => format!(
                "{} {} already deployed at {}",
                r.artifact_name, r.version, r.address
            ),
            _ => format!("Deployed {} {} at {}", r.artifact_name, r.version, r.address),
        }
    }
}

/// Result of `hoist plan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub artifact_name: String,
    /// `fresh`, `upgrade` or `unchanged`
    pub action: &'static str,
    pub target_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<RecordView>,
}

impl PlanReport {
    pub fn new(artifact_name: &str, target_version: String, plan: &Plan) -> Self {
        let (action, current) = match plan {
            Plan::Fresh => ("fresh", None),
            Plan::Upgrade { from } => ("upgrade", Some(from.into())),
            Plan::Unchanged { current } => ("unchanged", Some(current.into())),
        };
        Self {
            artifact_name: artifact_name.to_string(),
            action,
            target_version,
            current,
        }
    }

    pub fn headline(&self) -> String {
        match (&self.current, self.action) {
            (Some(current), "upgrade") => format!(
                "{}: would upgrade {} -> {} at {}",
                self.artifact_name, current.version, self.target_version, current.address
            ),
            (Some(current), _) => format!(
                "{}: {} is live at {}, nothing to do",
                self.artifact_name, current.version, current.address
            ),
            (None, _) => format!(
                "{}: would deploy {} fresh",
                self.artifact_name, self.target_version
            ),
        }
    }
}

/// One line of `hoist status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRow {
    pub artifact_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<RecordView>,
    /// `not-deployed`, `up-to-date`, `upgrade-pending`, `ahead` or `unconfigured`
    pub state: &'static str,
}

/// Result of `hoist history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub artifact_name: String,
    pub records: Vec<RecordView>,
}

impl HistoryReport {
    pub fn new(artifact_name: &str, history: &History) -> Self {
        Self {
            artifact_name: artifact_name.to_string(),
            records: history.iter().map(RecordView::from).collect(),
        }
    }
}
