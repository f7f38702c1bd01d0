//! CLI Commands

pub mod deploy;
pub mod history;
pub mod plan;
pub mod reconcile;
pub mod status;

pub use deploy::DeployCommand;
pub use history::HistoryCommand;
pub use plan::PlanCommand;
pub use reconcile::ReconcileCommand;
pub use status::StatusCommand;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// How results are printed
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Pretty JSON on stdout instead of human text
    pub json: bool,
}

impl Output {
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human());
        }
        Ok(())
    }

    /// Spinner on stderr; hidden in JSON mode
    pub fn spinner(&self, message: String) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
