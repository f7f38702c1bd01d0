//! hoist deploy command

use clap::Args;
use console::style;

use super::Output;
use crate::context::App;

#[derive(Debug, Args)]
pub struct DeployCommand {
    /// Artifact to deploy or upgrade
    pub artifact: String,
}

impl DeployCommand {
    pub fn run(&self, app: &App, output: Output) -> anyhow::Result<()> {
        let spinner = output.spinner(format!("Deploying {}", self.artifact));
        let result = hoist_usecase::deploy(app, &self.artifact);
        spinner.finish_and_clear();

        let report = result?;
        output.emit(&report, || {
            let mark = if report.action == "unchanged" {
                style("=").dim()
            } else {
                style("✓").green()
            };
            format!("{} {}", mark, report.headline())
        })
    }
}
