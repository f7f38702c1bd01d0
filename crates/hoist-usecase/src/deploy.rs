//! Deploy flows - What each CLI command asks of the orchestrator
//!
//! Init arguments come from the registered definition, i.e. from the
//! configuration file.

use hoist_domain::{
    Address, ArtifactRegistry, Clock, DeployError, Deployer, DeploymentStateStore, Orchestrator,
    StoreError, Version,
};
use tracing::{error, info, warn};

use crate::report::{HistoryReport, OutcomeReport, PlanReport, RecordView, StatusRow};

/// Deploy or upgrade `name` with its configured init arguments
pub fn deploy<R, S, D, C>(
    orchestrator: &Orchestrator<R, S, D, C>,
    name: &str,
) -> Result<OutcomeReport, DeployError>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
    C: Clock,
{
    let definition = orchestrator.registry().lookup(name)?;
    info!(
        artifact = name,
        version = %definition.version(),
        args = definition.init_args().len(),
        "deploy requested"
    );

    match orchestrator.deploy_or_upgrade(name, definition.init_args()) {
        Ok(outcome) => {
            let report = OutcomeReport::from(&outcome);
            info!(
                artifact = name,
                action = report.action,
                address = %report.record.address,
                "deploy finished"
            );
            Ok(report)
        }
        Err(e @ DeployError::StateReconciliationRequired { .. }) => {
            error!(artifact = name, kind = e.kind(), "{}", e);
            Err(e)
        }
        Err(e) => {
            warn!(artifact = name, kind = e.kind(), "{}", e);
            Err(e)
        }
    }
}

/// Describe what `deploy` would do
pub fn plan<R, S, D, C>(
    orchestrator: &Orchestrator<R, S, D, C>,
    name: &str,
) -> Result<PlanReport, DeployError>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
    C: Clock,
{
    let definition = orchestrator.registry().lookup(name)?;
    let plan = orchestrator.plan(name)?;
    Ok(PlanReport::new(name, definition.version().to_string(), &plan))
}

/// Record a manually verified deployment
pub fn reconcile<R, S, D, C>(
    orchestrator: &Orchestrator<R, S, D, C>,
    name: &str,
    address: &str,
    version: Version,
) -> Result<RecordView, DeployError>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
    C: Clock,
{
    warn!(artifact = name, address, version = %version, "recording manual reconciliation");
    let record = orchestrator.reconcile(name, Address::new(address), version)?;
    Ok(RecordView::from(&record))
}

/// Compare configured versions with what is live
///
/// Rows for every configured artifact in configuration order, then rows
/// for anything the store knows that the configuration no longer lists.
pub fn status<R, S, D, C>(
    orchestrator: &Orchestrator<R, S, D, C>,
) -> Result<Vec<StatusRow>, DeployError>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
    C: Clock,
{
    let store = orchestrator.store();
    let store_err = |name: &str| {
        let name = name.to_string();
        move |source: StoreError| DeployError::StateStoreIo { name, source }
    };

    let mut rows = Vec::new();
    for definition in orchestrator.registry().definitions() {
        let current = store
            .current(definition.name())
            .map_err(store_err(definition.name()))?;
        let state = match &current {
            None => "not-deployed",
            Some(c) if c.version() == definition.version() => "up-to-date",
            Some(c) if c.version() < definition.version() => "upgrade-pending",
            Some(_) => "ahead",
        };
        rows.push(StatusRow {
            artifact_name: definition.name().to_string(),
            configured_version: Some(definition.version().to_string()),
            current: current.as_ref().map(RecordView::from),
            state,
        });
    }

    for name in store.artifact_names().map_err(store_err("*"))? {
        if orchestrator.registry().contains(&name) {
            continue;
        }
        let current = store.current(&name).map_err(store_err(&name))?;
        rows.push(StatusRow {
            artifact_name: name,
            configured_version: None,
            current: current.as_ref().map(RecordView::from),
            state: "unconfigured",
        });
    }

    Ok(rows)
}

/// The lineage of `name`, oldest first
pub fn history<R, S, D, C>(
    orchestrator: &Orchestrator<R, S, D, C>,
    name: &str,
) -> Result<HistoryReport, DeployError>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
    C: Clock,
{
    let history = orchestrator
        .store()
        .history(name)
        .map_err(|source| DeployError::StateStoreIo {
            name: name.to_string(),
            source,
        })?;
    Ok(HistoryReport::new(name, &history))
}
