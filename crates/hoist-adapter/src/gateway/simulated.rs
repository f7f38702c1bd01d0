//! SimulatedDeployer - Local stand-in for a real deployer
//!
//! Fresh deploys mint a random 20-byte hex address, upgrades keep the
//! proxy address. Nothing leaves the process.

use std::sync::atomic::{AtomicUsize, Ordering};

use hoist_domain::{Address, ArtifactDefinition, Deployer, DeployerError, InitArg};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct SimulatedDeployer {
    calls: AtomicUsize,
}

impl SimulatedDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deploy and upgrade calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn mint_address() -> Address {
        let hex = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        Address::new(format!("0x{}", hex))
    }
}

impl Deployer for SimulatedDeployer {
    fn deploy_fresh(
        &self,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let address = Self::mint_address();
        info!(
            artifact = definition.name(),
            version = %definition.version(),
            initializer = definition.initializer(),
            args = init_args.len(),
            %address,
            "simulated fresh deploy"
        );
        Ok(address)
    }

    fn upgrade_in_place(
        &self,
        address: &Address,
        definition: &ArtifactDefinition,
        _init_args: &[InitArg],
    ) -> Result<Address, DeployerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!(
            artifact = definition.name(),
            version = %definition.version(),
            %address,
            "simulated upgrade"
        );
        Ok(address.clone())
    }
}
