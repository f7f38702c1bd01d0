//! Hoist CLI - Idempotent deploy-or-upgrade
//!
//! Usage:
//!   hoist deploy <name>        - Deploy fresh, upgrade in place, or do nothing
//!   hoist plan <name>          - Show what deploy would do
//!   hoist status [name]        - Configured versions vs. what is live
//!   hoist history <name>       - Every version ever recorded, oldest first
//!   hoist reconcile <name> --address <addr> --version <ver>
//!                              - Record a deployment verified by hand
//!
//! The configuration file is taken from `--config` or `HOIST_CONFIG`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cli::commands::{
    DeployCommand, HistoryCommand, Output, PlanCommand, ReconcileCommand, StatusCommand,
};
use cli::{context, exit};
use shared::HoistConfig;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Hoist - Idempotent deploy-or-upgrade for versioned artifacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to $HOIST_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy or upgrade an artifact to its configured version
    Deploy(DeployCommand),
    /// Show what deploy would do, without doing it
    Plan(PlanCommand),
    /// Compare configured versions with live deployments
    Status(StatusCommand),
    /// Show the deployment lineage of an artifact
    History(HistoryCommand),
    /// Record a deployment that was verified by hand
    Reconcile(ReconcileCommand),
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(exit::report(&e)),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = HoistConfig::resolve(cli.config.as_deref())?;
    let app = context::build(&config)?;
    let output = Output { json: cli.json };

    match &cli.command {
        Commands::Deploy(cmd) => cmd.run(&app, output),
        Commands::Plan(cmd) => cmd.run(&app, output),
        Commands::Status(cmd) => cmd.run(&app, output),
        Commands::History(cmd) => cmd.run(&app, output),
        Commands::Reconcile(cmd) => cmd.run(&app, output),
    }
}
