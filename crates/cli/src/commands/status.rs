//! hoist status command

use clap::Args;
use console::style;
use hoist_domain::DeployError;
use hoist_usecase::StatusRow;

use super::Output;
use crate::context::App;

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Only show this artifact
    pub artifact: Option<String>,
}

impl StatusCommand {
    pub fn run(&self, app: &App, output: Output) -> anyhow::Result<()> {
        let mut rows = hoist_usecase::status(app)?;

        if let Some(name) = &self.artifact {
            rows.retain(|row| &row.artifact_name == name);
            if rows.is_empty() {
                return Err(DeployError::UnknownArtifact { name: name.clone() }.into());
            }
        }

        output.emit(&rows, || {
            if rows.is_empty() {
                return "No artifacts configured".to_string();
            }
            rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
        })
    }
}

fn render_row(row: &StatusRow) -> String {
    let state = match row.state {
        "up-to-date" => style(row.state).green(),
        "upgrade-pending" | "not-deployed" => style(row.state).yellow(),
        _ => style(row.state).red(),
    };
    let configured = row.configured_version.as_deref().unwrap_or("-");
    let live = match &row.current {
        Some(current) => format!("{} at {}", current.version, current.address),
        None => "-".to_string(),
    };
    format!(
        "{:<24} configured {:<12} live {:<52} {}",
        style(&row.artifact_name).bold(),
        configured,
        live,
        state
    )
}
