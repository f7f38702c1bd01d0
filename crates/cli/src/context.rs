//! Wiring - Build the orchestrator a command runs against

use std::time::Duration;

use anyhow::Context as _;
use hoist_adapter::{CommandDeployer, InMemoryArtifactRegistry, JsonFileStateStore, SimulatedDeployer};
use hoist_domain::{Address, ArtifactDefinition, Deployer, DeployerError, InitArg, Orchestrator};
use hoist_usecase::register_catalog;
use shared::{DeployerConfig, HoistConfig};
use tracing::debug;

/// The deployer selected by configuration
#[derive(Debug)]
pub enum AppDeployer {
    Simulated(SimulatedDeployer),
    Command(CommandDeployer),
}

impl AppDeployer {
    pub fn from_config(config: &DeployerConfig) -> anyhow::Result<Self> {
        match config {
            DeployerConfig::Simulated => Ok(AppDeployer::Simulated(SimulatedDeployer::new())),
            DeployerConfig::Command {
                command,
                args,
                env,
                timeout_secs,
            } => {
                let deployer = CommandDeployer::new(
                    command.clone(),
                    args.clone(),
                    env.clone(),
                    timeout_secs.map(Duration::from_secs),
                )
                .context("failed to start the deployer runtime")?;
                Ok(AppDeployer::Command(deployer))
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AppDeployer::Simulated(_) => "simulated",
            AppDeployer::Command(d) => d.command(),
        }
    }
}

impl Deployer for AppDeployer {
    fn deploy_fresh(
        &self,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError> {
        match self {
            AppDeployer::Simulated(d) => d.deploy_fresh(definition, init_args),
            AppDeployer::Command(d) => d.deploy_fresh(definition, init_args),
        }
    }

    fn upgrade_in_place(
        &self,
        address: &Address,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError> {
        match self {
            AppDeployer::Simulated(d) => d.upgrade_in_place(address, definition, init_args),
            AppDeployer::Command(d) => d.upgrade_in_place(address, definition, init_args),
        }
    }
}

pub type App = Orchestrator<InMemoryArtifactRegistry, JsonFileStateStore, AppDeployer>;

/// Register the configured artifacts and open the state file
pub fn build(config: &HoistConfig) -> anyhow::Result<App> {
    let mut registry = InMemoryArtifactRegistry::new();
    let count = register_catalog(config, &mut registry)?;

    let store = JsonFileStateStore::new(config.state_path());
    let deployer = AppDeployer::from_config(&config.deployer)?;
    debug!(
        artifacts = count,
        state = %store.path().display(),
        deployer = deployer.label(),
        "context ready"
    );

    Ok(Orchestrator::new(registry, store, deployer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_domain::ArtifactRegistry;

    fn config_in(dir: &std::path::Path, body: &str) -> HoistConfig {
        let path = dir.join("hoist.json");
        std::fs::write(&path, body).unwrap();
        HoistConfig::from_file(&path).unwrap()
    }

    #[test]
    fn test_build_registers_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            r#"{ "artifacts": [ { "name": "Token", "version": "1.0.0" } ] }"#,
        );

        let app = build(&config).unwrap();

        assert!(app.registry().contains("Token"));
        assert_eq!(app.store().path(), dir.path().join(".hoist/state.json"));
        assert_eq!(app.deployer().label(), "simulated");
    }

    #[test]
    fn test_build_command_deployer() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            r#"{ "deployer": { "kind": "command", "command": "node", "args": ["bridge.js"], "timeoutSecs": 30 } }"#,
        );

        let app = build(&config).unwrap();
        match app.deployer() {
            AppDeployer::Command(d) => {
                assert_eq!(d.command(), "node");
                assert_eq!(d.timeout(), Some(Duration::from_secs(30)));
            }
            other => panic!("expected command deployer, got {:?}", other),
        }
    }

    #[test]
    fn test_build_surfaces_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            dir.path(),
            r#"{ "artifacts": [
                { "name": "Token", "version": "1.0.0" },
                { "name": "Token", "version": "2.0.0" }
            ] }"#,
        );

        let err = build(&config).err().unwrap();
        assert_eq!(crate::exit::error_kind(&err), "DuplicateArtifact");
    }
}
