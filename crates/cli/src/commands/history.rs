//! hoist history command

use clap::Args;
use console::style;

use super::Output;
use crate::context::App;

#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Artifact whose lineage to show
    pub artifact: String,
}

impl HistoryCommand {
    pub fn run(&self, app: &App, output: Output) -> anyhow::Result<()> {
        let report = hoist_usecase::history(app, &self.artifact)?;

        output.emit(&report, || {
            if report.records.is_empty() {
                return format!("{} has never been deployed", report.artifact_name);
            }
            let last = report.records.len() - 1;
            let mut lines = vec![style(&report.artifact_name).bold().to_string()];
            for (i, record) in report.records.iter().enumerate() {
                let marker = if i == last { "*" } else { " " };
                lines.push(format!(
                    "{} {:<12} {:<44} {}",
                    marker,
                    record.version,
                    record.address,
                    style(&record.deployed_at).dim()
                ));
            }
            lines.join("\n")
        })
    }
}
