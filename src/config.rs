use crate::error::TowerError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration for the `launch` subcommand, loaded from YAML.
///
/// ```yaml
/// workspace: my-workspace
/// compute-env: aws-batch
/// profile: test
/// pipelines:
///   rnaseq: "3.9"
///   sarek: "3.2.3"
/// outdir_base: s3://my-bucket/results
/// config_file: nextflow.config
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfig {
    /// Workspace to launch in; overridden by `--workspace`, falls back
    /// to the environment when absent.
    #[serde(default)]
    pub workspace: Option<String>,

    /// Compute environment the runs are submitted to.
    #[serde(rename = "compute-env", default)]
    pub compute_env: Option<String>,

    /// Pipeline profile, also embedded in the generated output path.
    #[serde(default)]
    pub profile: Option<String>,

    /// Pipeline name -> revision to launch.
    #[serde(default)]
    pub pipelines: BTreeMap<String, String>,

    /// Base path the per-run `outdir` parameter is derived from.
    #[serde(default)]
    pub outdir_base: Option<String>,

    /// Optional Nextflow config file forwarded to every launch.
    #[serde(default)]
    pub config_file: Option<PathBuf>,
}

impl LaunchConfig {
    pub fn from_file(path: &Path) -> Result<Self, TowerError> {
        let contents = fs::read_to_string(path).map_err(|e| TowerError::InvalidConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_yaml::from_str(&contents).map_err(|e| TowerError::InvalidConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Check that a params file is syntactically valid JSON or YAML before
/// handing it to the platform CLI. Anything else is rejected up front.
pub fn validate_params_file(path: &Path) -> Result<(), TowerError> {
    let invalid = |reason: String| TowerError::InvalidConfigFile {
        path: path.to_path_buf(),
        reason,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let contents = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;

    match extension.as_str() {
        "json" => serde_json::from_str::<serde_json::Value>(&contents)
            .map(|_| ())
            .map_err(|e| invalid(format!("not valid JSON: {e}"))),
        "yaml" | "yml" => serde_yaml::from_str::<serde_yaml::Value>(&contents)
            .map(|_| ())
            .map_err(|e| invalid(format!("not valid YAML: {e}"))),
        other => Err(invalid(format!(
            "unsupported file type '{other}', provide a .json or .yaml file"
        ))),
    }
}
