//! Error kinds and exit codes
//!
//! | code | kind                          |
//! |------|-------------------------------|
//! | 0    | success                       |
//! | 2    | UnknownArtifact               |
//! | 3    | DuplicateArtifact             |
//! | 4    | DowngradeRejected             |
//! | 5    | DeploymentFailed              |
//! | 6    | UpgradeFailed                 |
//! | 7    | StateStoreIOError             |
//! | 8    | StateReconciliationRequired   |
//! | 9    | ConfigError                   |
//! | 1    | anything else                 |

use console::style;
use hoist_domain::DeployError;
use hoist_usecase::CatalogError;
use shared::HoistError;

/// Find the printed kind of an error, looking through its causes
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<DeployError>() {
            return e.kind();
        }
        if let Some(e) = cause.downcast_ref::<CatalogError>() {
            return e.kind();
        }
        if let Some(e) = cause.downcast_ref::<HoistError>() {
            return e.kind();
        }
    }
    "Error"
}

pub fn exit_code(kind: &str) -> u8 {
    match kind {
        "UnknownArtifact" => 2,
        "DuplicateArtifact" => 3,
        "DowngradeRejected" => 4,
        "DeploymentFailed" => 5,
        "UpgradeFailed" => 6,
        "StateStoreIOError" => 7,
        "StateReconciliationRequired" => 8,
        "ConfigError" => 9,
        _ => 1,
    }
}

/// Print `error[<Kind>]: <message>` to stderr; returns the exit code
pub fn report(err: &anyhow::Error) -> u8 {
    let kind = error_kind(err);
    eprintln!(
        "{}: {:#}",
        style(format!("error[{}]", kind)).for_stderr().red().bold(),
        err
    );
    if kind == "StateReconciliationRequired" {
        eprintln!(
            "{}",
            style("Verify the deployment by hand, then record it with `hoist reconcile`.")
                .for_stderr()
                .yellow()
        );
    }
    exit_code(kind)
}
