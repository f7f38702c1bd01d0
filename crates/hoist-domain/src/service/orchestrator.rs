//! Orchestrator - Deploy-or-upgrade decision engine
//!
//! For a requested artifact the Orchestrator:
//! 1. Resolves: looks the definition up in the registry
//! 2. Observes: reads the current record from the state store
//! 3. Decides: fresh deploy, upgrade, no-op, or refuse a downgrade
//! 4. Acts: makes at most one deployer call and at most one store write
//!
//! There is no ambient state. Registry, store, deployer and clock are
//! injected, so the same engine runs against memory in tests and against
//! files and real SDKs in the CLI.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::DeployError;
use crate::model::artifact::{ArtifactDefinition, InitArg};
use crate::model::record::{Address, DeploymentRecord};
use crate::model::version::Version;
use crate::repository::artifact_registry::ArtifactRegistry;
use crate::repository::state_store::{DeploymentStateStore, StoreError};
use crate::service::clock::{Clock, SystemClock};
use crate::service::deployer::{Deployer, DeployerError};

/// What `deploy_or_upgrade` would do right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing is live yet
    Fresh,
    /// A lower version is live and will be upgraded in place
    Upgrade { from: DeploymentRecord },
    /// The requested version is already live
    Unchanged { current: DeploymentRecord },
}

/// What `deploy_or_upgrade` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed {
        record: DeploymentRecord,
    },
    Upgraded {
        previous: DeploymentRecord,
        record: DeploymentRecord,
    },
    Unchanged {
        record: DeploymentRecord,
    },
}

impl DeployOutcome {
    /// The record that is current after the call
    pub fn record(&self) -> &DeploymentRecord {
        match self {
            DeployOutcome::Deployed { record }
            | DeployOutcome::Upgraded { record, .. }
            | DeployOutcome::Unchanged { record } => record,
        }
    }

    /// True when the deployer was called
    pub fn changed(&self) -> bool {
        !matches!(self, DeployOutcome::Unchanged { .. })
    }
}

/// Orchestrator - The deployment engine
///
/// `&self` methods only. Calls for the same artifact name are serialized
/// by a per-name guard held for the whole call; calls for different names
/// may run in parallel when the parts are `Sync`.
pub struct Orchestrator<R, S, D, C = SystemClock> {
    registry: R,
    store: S,
    deployer: D,
    clock: C,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<R, S, D> Orchestrator<R, S, D, SystemClock>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
{
    /// Create an Orchestrator stamping records with the wall clock
    pub fn new(registry: R, store: S, deployer: D) -> Self {
        Self {
            registry,
            store,
            deployer,
            clock: SystemClock,
            in_flight: Mutex::new(HashMap::new()),
        }
    }
}

impl<R, S, D, C> Orchestrator<R, S, D, C>
where
    R: ArtifactRegistry,
    S: DeploymentStateStore,
    D: Deployer,
    C: Clock,
{
    /// Replace the clock
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Orchestrator<R, S, D, C2> {
        Orchestrator {
            registry: self.registry,
            store: self.store,
            deployer: self.deployer,
            clock,
            in_flight: self.in_flight,
        }
    }

    // ========== Getters ==========

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    // ========== Operations ==========

    /// Decide what `deploy_or_upgrade` would do, without doing it
    pub fn plan(&self, name: &str) -> Result<Plan, DeployError> {
        let definition = self.registry.lookup(name)?;
        let current = self.current(name)?;
        decide(&definition, current)
    }

    /// Make the registered version of `name` live
    ///
    /// Calls the deployer at most once and writes the store at most once.
    /// Never retries: a failure after the deployer succeeded is reported
    /// as `StateReconciliationRequired`.
    pub fn deploy_or_upgrade(
        &self,
        name: &str,
        init_args: &[InitArg],
    ) -> Result<DeployOutcome, DeployError> {
        let definition = self.registry.lookup(name)?;

        let guard = self.name_guard(name);
        let _held = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.current(name)?;

        match decide(&definition, current)? {
            Plan::Unchanged { current } => Ok(DeployOutcome::Unchanged { record: current }),

            Plan::Fresh => {
                let address = self
                    .deployer
                    .deploy_fresh(&definition, init_args)
                    .map_err(|e| match e {
                        DeployerError::Failed { reason } => DeployError::DeploymentFailed {
                            name: name.to_string(),
                            reason,
                        },
                        timed_out @ DeployerError::TimedOut { .. } => {
                            unknown_outcome(name, None, definition.version(), &timed_out)
                        }
                    })?;

                let record = self.persist(name, address, definition.version())?;
                Ok(DeployOutcome::Deployed { record })
            }

            Plan::Upgrade { from } => {
                let address = self
                    .deployer
                    .upgrade_in_place(from.address(), &definition, init_args)
                    .map_err(|e| match e {
                        DeployerError::Failed { reason } => DeployError::UpgradeFailed {
                            name: name.to_string(),
                            address: from.address().clone(),
                            reason,
                        },
                        // The deployer never returned an address
                        timed_out @ DeployerError::TimedOut { .. } => {
                            unknown_outcome(name, None, definition.version(), &timed_out)
                        }
                    })?;

                let record = self.persist(name, address, definition.version())?;
                Ok(DeployOutcome::Upgraded {
                    previous: from,
                    record,
                })
            }
        }
    }

    /// Record an outcome an operator verified by hand
    ///
    /// No deployer call. The artifact must be registered, the address
    /// non-blank and the version not lower than the current one.
    pub fn reconcile(
        &self,
        name: &str,
        address: Address,
        version: Version,
    ) -> Result<DeploymentRecord, DeployError> {
        self.registry.lookup(name)?;
        if address.as_str().trim().is_empty() {
            return Err(DeployError::InvalidAddress {
                name: name.to_string(),
            });
        }

        let guard = self.name_guard(name);
        let _held = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let record = DeploymentRecord::new(name, address, version, self.clock.now());
        self.store
            .set_current(record.clone())
            .map_err(|source| match source {
                StoreError::NonMonotonic {
                    name,
                    current,
                    attempted,
                } => DeployError::DowngradeRejected {
                    name,
                    current,
                    requested: attempted,
                },
                source => DeployError::StateStoreIo {
                    name: name.to_string(),
                    source,
                },
            })?;
        Ok(record)
    }

    fn current(&self, name: &str) -> Result<Option<DeploymentRecord>, DeployError> {
        self.store
            .current(name)
            .map_err(|source| DeployError::StateStoreIo {
                name: name.to_string(),
                source,
            })
    }

    fn persist(
        &self,
        name: &str,
        address: Address,
        version: &Version,
    ) -> Result<DeploymentRecord, DeployError> {
        let record = DeploymentRecord::new(name, address, version.clone(), self.clock.now());
        match self.store.set_current(record.clone()) {
            Ok(()) => Ok(record),
            Err(e) => Err(DeployError::StateReconciliationRequired {
                name: name.to_string(),
                address: Some(record.address().clone()),
                version: version.clone(),
                reason: format!("deployer succeeded but recording the result failed: {}", e),
            }),
        }
    }

    fn name_guard(&self, name: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.entry(name.to_string()).or_default().clone()
    }
}

/// The deploy/upgrade/no-op/downgrade decision
fn decide(
    definition: &ArtifactDefinition,
    current: Option<DeploymentRecord>,
) -> Result<Plan, DeployError> {
    let Some(current) = current else {
        return Ok(Plan::Fresh);
    };

    match definition.version().cmp(current.version()) {
        core::cmp::Ordering::Equal => Ok(Plan::Unchanged { current }),
        core::cmp::Ordering::Greater => Ok(Plan::Upgrade { from: current }),
        core::cmp::Ordering::Less => Err(DeployError::DowngradeRejected {
            name: definition.name().to_string(),
            current: current.version().clone(),
            requested: definition.version().clone(),
        }),
    }
}

fn unknown_outcome(
    name: &str,
    address: Option<Address>,
    version: &Version,
    cause: &DeployerError,
) -> DeployError {
    DeployError::StateReconciliationRequired {
        name: name.to_string(),
        address,
        version: version.clone(),
        reason: format!("outcome unknown, not retried: {}", cause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Timestamp;
    use crate::repository::state_store::{ensure_monotonic, History};
    use core::time::Duration;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    // ============== Test doubles ==============

    #[derive(Default)]
    struct MapRegistry {
        definitions: HashMap<String, ArtifactDefinition>,
    }

    impl ArtifactRegistry for MapRegistry {
        fn register(&mut self, definition: ArtifactDefinition) -> Result<(), DeployError> {
            if self.definitions.contains_key(definition.name()) {
                return Err(DeployError::DuplicateArtifact {
                    name: definition.name().to_string(),
                });
            }
            self.definitions
                .insert(definition.name().to_string(), definition);
            Ok(())
        }

        fn lookup(&self, name: &str) -> Result<ArtifactDefinition, DeployError> {
            self.definitions
                .get(name)
                .cloned()
                .ok_or_else(|| DeployError::UnknownArtifact {
                    name: name.to_string(),
                })
        }

        fn definitions(&self) -> Vec<ArtifactDefinition> {
            self.definitions.values().cloned().collect()
        }
    }

    #[derive(Default)]
    struct MapStore {
        lineages: Mutex<HashMap<String, Vec<DeploymentRecord>>>,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl MapStore {
        fn seeded(records: Vec<DeploymentRecord>) -> Self {
            let store = Self::default();
            for record in records {
                store.set_current(record).unwrap();
            }
            store.writes.store(0, Ordering::SeqCst);
            store
        }
    }

    impl DeploymentStateStore for MapStore {
        fn current(&self, name: &str) -> Result<Option<DeploymentRecord>, StoreError> {
            let lineages = self.lineages.lock().unwrap();
            Ok(lineages.get(name).and_then(|l| l.last().cloned()))
        }

        fn set_current(&self, record: DeploymentRecord) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Io {
                    message: "disk full".to_string(),
                });
            }
            let mut lineages = self.lineages.lock().unwrap();
            let lineage = lineages.entry(record.artifact_name().to_string()).or_default();
            ensure_monotonic(lineage.last(), &record)?;
            lineage.push(record);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn history(&self, name: &str) -> Result<History, StoreError> {
            let lineages = self.lineages.lock().unwrap();
            Ok(History::new(lineages.get(name).cloned().unwrap_or_default()))
        }

        fn artifact_names(&self) -> Result<Vec<String>, StoreError> {
            let lineages = self.lineages.lock().unwrap();
            let mut names: Vec<_> = lineages.keys().cloned().collect();
            names.sort();
            Ok(names)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Fresh { name: String, args: Vec<InitArg> },
        Upgrade { address: String, version: Version },
    }

    #[derive(Default)]
    struct RecordingDeployer {
        calls: Mutex<Vec<Call>>,
        counter: AtomicUsize,
        fail_with: Mutex<Option<DeployerError>>,
        move_on_upgrade: bool,
    }

    impl RecordingDeployer {
        fn failing(error: DeployerError) -> Self {
            Self {
                fail_with: Mutex::new(Some(error)),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn next_address(&self) -> Address {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            Address::new(format!("addr{}", n))
        }

        fn failure(&self) -> Option<DeployerError> {
            self.fail_with.lock().unwrap().clone()
        }
    }

    impl Deployer for RecordingDeployer {
        fn deploy_fresh(
            &self,
            definition: &ArtifactDefinition,
            init_args: &[InitArg],
        ) -> Result<Address, DeployerError> {
            self.calls.lock().unwrap().push(Call::Fresh {
                name: definition.name().to_string(),
                args: init_args.to_vec(),
            });
            if let Some(e) = self.failure() {
                return Err(e);
            }
            // Give concurrent callers a chance to race
            std::thread::sleep(Duration::from_millis(5));
            Ok(self.next_address())
        }

        fn upgrade_in_place(
            &self,
            address: &Address,
            definition: &ArtifactDefinition,
            _init_args: &[InitArg],
        ) -> Result<Address, DeployerError> {
            self.calls.lock().unwrap().push(Call::Upgrade {
                address: address.as_str().to_string(),
                version: definition.version().clone(),
            });
            if let Some(e) = self.failure() {
                return Err(e);
            }
            if self.move_on_upgrade {
                Ok(self.next_address())
            } else {
                Ok(address.clone())
            }
        }
    }

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0)
        }
    }

    // ============== Helpers ==============

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn registry_with(definitions: &[(&str, &str)]) -> MapRegistry {
        let mut registry = MapRegistry::default();
        for (name, version) in definitions {
            registry
                .register(ArtifactDefinition::new(*name, v(version)))
                .unwrap();
        }
        registry
    }

    fn record(name: &str, address: &str, version: &str) -> DeploymentRecord {
        DeploymentRecord::new(name, Address::new(address), v(version), Timestamp::from_millis(1))
    }

    fn orchestrator(
        registry: MapRegistry,
        store: MapStore,
        deployer: RecordingDeployer,
    ) -> Orchestrator<MapRegistry, MapStore, RecordingDeployer, FixedClock> {
        Orchestrator::new(registry, store, deployer).with_clock(FixedClock(42))
    }

    // ============== Scenarios ==============

    #[test]
    fn test_fresh_deploy_on_empty_store() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );
        let args = vec![InitArg::Text("TKN".into())];

        let outcome = orch.deploy_or_upgrade("Token", &args).unwrap();

        assert_eq!(
            outcome,
            DeployOutcome::Deployed {
                record: DeploymentRecord::new(
                    "Token",
                    Address::new("addr1"),
                    v("1.0.0"),
                    Timestamp::from_millis(42)
                ),
            }
        );
        assert_eq!(
            orch.deployer().calls(),
            vec![Call::Fresh {
                name: "Token".into(),
                args
            }]
        );
        assert_eq!(orch.store().writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_upgrade_in_place_from_lower_version() {
        let deployer = RecordingDeployer {
            move_on_upgrade: true,
            ..RecordingDeployer::default()
        };
        deployer.counter.store(1, Ordering::SeqCst);
        let orch = orchestrator(
            registry_with(&[("Token", "1.1.0")]),
            MapStore::seeded(vec![record("Token", "addr1", "1.0.0")]),
            deployer,
        );

        let outcome = orch.deploy_or_upgrade("Token", &[]).unwrap();

        match outcome {
            DeployOutcome::Upgraded { previous, record } => {
                assert_eq!(previous.address().as_str(), "addr1");
                assert_eq!(record.address().as_str(), "addr2");
                assert_eq!(record.version(), &v("1.1.0"));
            }
            other => panic!("expected upgrade, got {:?}", other),
        }
        assert_eq!(
            orch.deployer().calls(),
            vec![Call::Upgrade {
                address: "addr1".into(),
                version: v("1.1.0")
            }]
        );

        let history = orch.store().history("Token").unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.is_monotonic());
    }

    #[test]
    fn test_upgrade_may_keep_address() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.1.0")]),
            MapStore::seeded(vec![record("Token", "proxy", "1.0.0")]),
            RecordingDeployer::default(),
        );

        let outcome = orch.deploy_or_upgrade("Token", &[]).unwrap();
        assert_eq!(outcome.record().address().as_str(), "proxy");
    }

    #[test]
    fn test_downgrade_rejected_without_side_effects() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::seeded(vec![record("Token", "addr1", "2.0.0")]),
            RecordingDeployer::default(),
        );

        let err = orch.deploy_or_upgrade("Token", &[]).unwrap_err();

        assert_eq!(
            err,
            DeployError::DowngradeRejected {
                name: "Token".into(),
                current: v("2.0.0"),
                requested: v("1.0.0"),
            }
        );
        assert!(orch.deployer().calls().is_empty());
        assert_eq!(orch.store().writes.load(Ordering::SeqCst), 0);
        assert_eq!(
            orch.store().current("Token").unwrap().unwrap().version(),
            &v("2.0.0")
        );
    }

    #[test]
    fn test_same_version_is_idempotent() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );

        let first = orch.deploy_or_upgrade("Token", &[]).unwrap();
        let second = orch.deploy_or_upgrade("Token", &[]).unwrap();

        assert!(first.changed());
        assert!(!second.changed());
        assert_eq!(first.record(), second.record());
        assert_eq!(orch.deployer().calls().len(), 1);
        assert_eq!(orch.store().writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_artifact() {
        let orch = orchestrator(
            MapRegistry::default(),
            MapStore::default(),
            RecordingDeployer::default(),
        );

        let err = orch.deploy_or_upgrade("Ghost", &[]).unwrap_err();
        assert_eq!(err.kind(), "UnknownArtifact");
        assert!(orch.deployer().calls().is_empty());
    }

    // ============== Failures ==============

    #[test]
    fn test_deploy_failure_leaves_store_untouched() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::failing(DeployerError::Failed {
                reason: "out of gas".into(),
            }),
        );

        let err = orch.deploy_or_upgrade("Token", &[]).unwrap_err();
        assert_eq!(
            err,
            DeployError::DeploymentFailed {
                name: "Token".into(),
                reason: "out of gas".into()
            }
        );
        assert!(orch.store().current("Token").unwrap().is_none());
    }

    #[test]
    fn test_upgrade_failure_names_address() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.1.0")]),
            MapStore::seeded(vec![record("Token", "addr1", "1.0.0")]),
            RecordingDeployer::failing(DeployerError::Failed {
                reason: "storage layout changed".into(),
            }),
        );

        let err = orch.deploy_or_upgrade("Token", &[]).unwrap_err();
        assert!(matches!(
            &err,
            DeployError::UpgradeFailed { address, .. } if address.as_str() == "addr1"
        ));
        assert_eq!(orch.store().history("Token").unwrap().len(), 1);
    }

    #[test]
    fn test_store_failure_after_deploy_requires_reconciliation() {
        let store = MapStore::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            store,
            RecordingDeployer::default(),
        );

        let err = orch.deploy_or_upgrade("Token", &[]).unwrap_err();

        match err {
            DeployError::StateReconciliationRequired {
                address, version, ..
            } => {
                assert_eq!(address, Some(Address::new("addr1")));
                assert_eq!(version, v("1.0.0"));
            }
            other => panic!("expected reconciliation, got {:?}", other),
        }
        assert_eq!(orch.deployer().calls().len(), 1);
    }

    #[test]
    fn test_timeout_is_unknown_outcome_and_not_retried() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::failing(DeployerError::TimedOut {
                after: Duration::from_secs(30),
            }),
        );

        let err = orch.deploy_or_upgrade("Token", &[]).unwrap_err();

        assert_eq!(err.kind(), "StateReconciliationRequired");
        assert_eq!(orch.deployer().calls().len(), 1);
        assert!(orch.store().current("Token").unwrap().is_none());
    }

    #[test]
    fn test_upgrade_timeout_reports_no_address() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.1.0")]),
            MapStore::seeded(vec![record("Token", "0xold", "1.0.0")]),
            RecordingDeployer::failing(DeployerError::TimedOut {
                after: Duration::from_secs(30),
            }),
        );

        let err = orch.deploy_or_upgrade("Token", &[]).unwrap_err();

        match &err {
            DeployError::StateReconciliationRequired {
                address, version, ..
            } => {
                assert_eq!(address, &None);
                assert_eq!(version, &v("1.1.0"));
            }
            other => panic!("expected reconciliation, got {:?}", other),
        }
        assert!(!err.to_string().contains("0xold"));
        assert_eq!(orch.deployer().calls().len(), 1);
        assert_eq!(
            orch.store().current("Token").unwrap().unwrap().version(),
            &v("1.0.0")
        );
    }

    #[test]
    fn test_unknown_names_do_not_accumulate_guards() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );

        for i in 0..10 {
            let name = format!("Ghost{}", i);
            assert!(orch.deploy_or_upgrade(&name, &[]).is_err());
            assert!(orch.reconcile(&name, Address::new("x"), v("1.0.0")).is_err());
        }

        assert!(orch.in_flight.lock().unwrap().is_empty());
    }

    // ============== Plan & reconcile ==============

    #[test]
    fn test_plan_has_no_side_effects() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.1.0"), ("Vault", "1.0.0"), ("Old", "0.1.0")]),
            MapStore::seeded(vec![
                record("Token", "addr1", "1.0.0"),
                record("Vault", "addr9", "1.0.0"),
                record("Old", "addr5", "1.0.0"),
            ]),
            RecordingDeployer::default(),
        );

        assert!(matches!(orch.plan("Token").unwrap(), Plan::Upgrade { .. }));
        assert!(matches!(orch.plan("Vault").unwrap(), Plan::Unchanged { .. }));
        assert_eq!(orch.plan("Old").unwrap_err().kind(), "DowngradeRejected");
        assert!(orch.deployer().calls().is_empty());
        assert_eq!(orch.store().writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_plan_fresh() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );
        assert_eq!(orch.plan("Token").unwrap(), Plan::Fresh);
    }

    #[test]
    fn test_reconcile_records_without_deployer() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );

        let record = orch
            .reconcile("Token", Address::new("0xfeed"), v("1.0.0"))
            .unwrap();

        assert_eq!(record.address().as_str(), "0xfeed");
        assert!(orch.deployer().calls().is_empty());
        // Now deploy is a no-op
        assert!(!orch.deploy_or_upgrade("Token", &[]).unwrap().changed());
    }

    #[test]
    fn test_reconcile_rejects_lower_version() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::seeded(vec![record("Token", "addr1", "1.2.0")]),
            RecordingDeployer::default(),
        );

        let err = orch
            .reconcile("Token", Address::new("addr1"), v("1.1.0"))
            .unwrap_err();
        assert_eq!(err.kind(), "DowngradeRejected");
    }

    #[test]
    fn test_reconcile_rejects_blank_address() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );

        for blank in ["", "   "] {
            let err = orch
                .reconcile("Token", Address::new(blank), v("1.0.0"))
                .unwrap_err();
            assert_eq!(err, DeployError::InvalidAddress { name: "Token".into() });
        }
        assert!(orch.store().current("Token").unwrap().is_none());
        assert_eq!(orch.store().writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reconcile_unknown_artifact() {
        let orch = orchestrator(
            MapRegistry::default(),
            MapStore::default(),
            RecordingDeployer::default(),
        );
        let err = orch
            .reconcile("Ghost", Address::new("x"), v("1.0.0"))
            .unwrap_err();
        assert_eq!(err.kind(), "UnknownArtifact");
    }

    // ============== Properties ==============

    #[test]
    fn test_history_stays_monotonic_across_versions() {
        let mut store = MapStore::default();
        for version in ["1.0.0", "1.0.1", "1.1.0-rc.1", "1.1.0", "2.0.0"] {
            let orch = orchestrator(
                registry_with(&[("Token", version)]),
                store,
                RecordingDeployer::default(),
            );
            orch.deploy_or_upgrade("Token", &[]).unwrap();
            store = orch.store;
        }

        let history = store.history("Token").unwrap();
        assert_eq!(history.len(), 5);
        assert!(history.is_monotonic());
    }

    #[test]
    fn test_same_name_requests_are_serialized() {
        let orch = orchestrator(
            registry_with(&[("Token", "1.0.0"), ("Vault", "1.0.0")]),
            MapStore::default(),
            RecordingDeployer::default(),
        );

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| orch.deploy_or_upgrade("Token", &[]).unwrap());
                scope.spawn(|| orch.deploy_or_upgrade("Vault", &[]).unwrap());
            }
        });

        let fresh_calls = orch
            .deployer()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Fresh { .. }))
            .count();
        assert_eq!(fresh_calls, 2);
        assert_eq!(orch.store().artifact_names().unwrap(), vec!["Token", "Vault"]);
    }
}
