//! hoist plan command

use clap::Args;

use super::Output;
use crate::context::App;

#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Artifact to inspect
    pub artifact: String,
}

impl PlanCommand {
    pub fn run(&self, app: &App, output: Output) -> anyhow::Result<()> {
        let report = hoist_usecase::plan(app, &self.artifact)?;
        output.emit(&report, || report.headline())
    }
}
