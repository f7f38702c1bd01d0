//! CommandDeployer - Bridges to an external SDK helper process
//!
//! The helper is started once per call with the configured arguments
//! followed by `fresh` or `upgrade`. It receives one JSON request on stdin
//! and answers with a line like `{"address":"0x..."}` on stdout.

use std::collections::HashMap;
use std::process::{Output, Stdio};
use std::time::Duration;

use hoist_domain::{Address, ArtifactDefinition, Deployer, DeployerError, InitArg};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use super::init_arg_to_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployRequest<'a> {
    action: &'static str,
    artifact: &'a str,
    version: String,
    initializer: &'a str,
    init_args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
}

impl<'a> DeployRequest<'a> {
    fn new(
        action: &'static str,
        definition: &'a ArtifactDefinition,
        init_args: &[InitArg],
        address: Option<&'a Address>,
    ) -> Self {
        Self {
            action,
            artifact: definition.name(),
            version: definition.version().to_string(),
            initializer: definition.initializer(),
            init_args: init_args.iter().map(init_arg_to_json).collect(),
            address: address.map(Address::as_str),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeployResponse {
    address: String,
}

/// Deployer that delegates to an external command
///
/// The `Deployer` port is synchronous; each call blocks on a private
/// current-thread runtime. Do not call it from inside another runtime.
#[derive(Debug)]
pub struct CommandDeployer {
    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    timeout: Option<Duration>,
    runtime: Runtime,
}

impl CommandDeployer {
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        env: HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            command: command.into(),
            args,
            env,
            timeout,
            runtime,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn run(&self, request: &DeployRequest<'_>) -> Result<Address, DeployerError> {
        let mut payload = serde_json::to_vec(request).map_err(|e| DeployerError::Failed {
            reason: format!("cannot encode request: {}", e),
        })?;
        payload.push(b'\n');

        info!(
            command = %self.command,
            action = request.action,
            artifact = request.artifact,
            version = %request.version,
            "invoking deployer"
        );

        let exchange = self.exchange(request.action, payload);
        let output = match self.timeout {
            Some(limit) => self
                .runtime
                .block_on(async { tokio::time::timeout(limit, exchange).await })
                .map_err(|_| {
                    warn!(command = %self.command, ?limit, "deployer timed out, killed");
                    DeployerError::TimedOut { after: limit }
                })?,
            None => self.runtime.block_on(exchange),
        }?;

        parse_output(&output)
    }

    async fn exchange(&self, action: &str, payload: Vec<u8>) -> Result<Output, DeployerError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(action)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| DeployerError::Failed {
            reason: format!("failed to start '{}': {}", self.command, e),
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A helper that ignores its input may close stdin early
            if let Err(e) = stdin.write_all(&payload).await {
                debug!(error = %e, "deployer did not read the request");
            }
        }

        child
            .wait_with_output()
            .await
            .map_err(|e| DeployerError::Failed {
                reason: format!("lost contact with '{}': {}", self.command, e),
            })
    }
}

fn parse_output(output: &Output) -> Result<Address, DeployerError> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();

    if !output.status.success() {
        let mut reason = format!("deployer exited with {}", output.status);
        if !stderr.is_empty() {
            reason.push_str(": ");
            reason.push_str(stderr);
        }
        return Err(DeployerError::Failed { reason });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let address = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<DeployResponse>(line.trim()).ok())
        .map(|response| response.address)
        .find(|address| !address.is_empty());

    match address {
        Some(address) => Ok(Address::new(address)),
        None => {
            let mut reason = "deployer reported no address".to_string();
            if !stderr.is_empty() {
                reason.push_str(": ");
                reason.push_str(stderr);
            }
            Err(DeployerError::Failed { reason })
        }
    }
}

impl Deployer for CommandDeployer {
    fn deploy_fresh(
        &self,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError> {
        self.run(&DeployRequest::new("fresh", definition, init_args, None))
    }

    fn upgrade_in_place(
        &self,
        address: &Address,
        definition: &ArtifactDefinition,
        init_args: &[InitArg],
    ) -> Result<Address, DeployerError> {
        self.run(&DeployRequest::new(
            "upgrade",
            definition,
            init_args,
            Some(address),
        ))
    }
}
