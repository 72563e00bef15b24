pub mod compute_envs;
pub mod lookup;
pub mod pipelines;
pub mod runner;

pub use compute_envs::ComputeEnvs;
pub use pipelines::{LaunchRequest, Pipelines};
pub use runner::TowerRunner;

use crate::error::TowerError;
use serde_json::Value;

/// Check that named credentials exist in the workspace before they are
/// handed to an import.
pub fn validate_credentials(
    runner: &TowerRunner,
    workspace: &str,
    credentials: &str,
) -> Result<(), TowerError> {
    let listing = runner.run_json(&[
        "credentials".to_string(),
        "list".to_string(),
        "--workspace".to_string(),
        workspace.to_string(),
    ])?;

    if !lookup::find_key_value(&listing, "name", &Value::String(credentials.to_string())) {
        return Err(TowerError::ResourceNotFound(credentials.to_string()));
    }

    Ok(())
}
