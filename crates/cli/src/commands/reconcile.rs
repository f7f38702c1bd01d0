//! hoist reconcile command
//!
//! Records a deployment an operator verified by hand, typically after a
//! `StateReconciliationRequired` error.

use anyhow::Context as _;
use clap::Args;
use console::style;
use dialoguer::Confirm;
use hoist_domain::Version;

use super::Output;
use crate::context::App;

#[derive(Debug, Args)]
pub struct ReconcileCommand {
    /// Artifact to record
    pub artifact: String,

    /// Address the artifact is live at
    #[arg(long)]
    pub address: String,

    /// Version that is live there
    #[arg(long, value_parser = parse_version)]
    pub version: Version,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_version(s: &str) -> Result<Version, String> {
    Version::parse(s).map_err(|e| e.to_string())
}

impl ReconcileCommand {
    pub fn run(&self, app: &App, output: Output) -> anyhow::Result<()> {
        if !self.yes {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Record {} {} as live at {}?",
                    self.artifact, self.version, self.address
                ))
                .default(false)
                .interact()
                .context("confirmation needs a terminal; pass --yes")?;
            if !confirmed {
                eprintln!("{}", style("Nothing recorded").for_stderr().yellow());
                return Ok(());
            }
        }

        let view = hoist_usecase::reconcile(app, &self.artifact, &self.address, self.version.clone())?;
        output.emit(&view, || {
            format!(
                "{} Recorded {} {} at {}",
                style("✓").green(),
                view.artifact_name,
                view.version,
                view.address
            )
        })
    }
}
