use crate::config::LaunchConfig;
use crate::context::Context;
use crate::error::TowerError;
use crate::output;
use crate::settings::Settings;
use crate::tower::{LaunchRequest, Pipelines, TowerRunner};
use clap::Args;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{error, info};

const NF_CORE_PREFIX: &str = "https://github.com/nf-core/";

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// YAML run config with the pipelines to launch
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Handles the 'launch' command - launch every pipeline of a run config
/// with a generated params file. Returns the number of failed launches.
pub struct LaunchCommand;

impl LaunchCommand {
    pub fn execute(
        ctx: &Context,
        workspace_flag: Option<&str>,
        args: &LaunchArgs,
    ) -> Result<usize, TowerError> {
        let config_path = args
            .config
            .as_ref()
            .ok_or_else(|| TowerError::Usage("--config <FILE> is required".to_string()))?;
        let config = LaunchConfig::from_file(config_path)?;

        // The workspace flag wins over the config file, which wins over
        // the environment default
        let settings = Settings::resolve(workspace_flag.or(config.workspace.as_deref()))?;

        Self::run(ctx, &settings, &config, config_path)
    }

    fn run(
        ctx: &Context,
        settings: &Settings,
        config: &LaunchConfig,
        config_path: &Path,
    ) -> Result<usize, TowerError> {
        let profile = config
            .profile
            .as_deref()
            .ok_or_else(|| TowerError::InvalidConfigFile {
                path: config_path.to_path_buf(),
                reason: "missing 'profile'".to_string(),
            })?;

        let runner = TowerRunner::new(Arc::clone(&ctx.command));
        let pipelines = Pipelines::new(&runner, &settings.workspace);
        let stamp = date_stamp();

        let total = config.pipelines.len();
        let mut failures = 0;
        for (index, (pipeline, revision)) in config.pipelines.iter().enumerate() {
            output::progress(index + 1, total, pipeline);
            match Self::launch_one(&pipelines, config, profile, pipeline, revision, &stamp) {
                Ok(_) => info!(
                    "launched pipeline '{pipeline}' at revision {revision} with profile '{profile}'"
                ),
                Err(e) => {
                    error!("failed to launch pipeline '{pipeline}': {e}");
                    failures += 1;
                }
            }
        }

        Ok(failures)
    }

    fn launch_one(
        pipelines: &Pipelines,
        config: &LaunchConfig,
        profile: &str,
        pipeline: &str,
        revision: &str,
        stamp: &str,
    ) -> Result<String, TowerError> {
        // The generated params file must outlive the launch invocation
        let params_file = config
            .outdir_base
            .as_deref()
            .map(|base| write_params_file(&outdir_for(base, pipeline, profile, stamp)))
            .transpose()?;

        let request = LaunchRequest {
            repository: format!("{NF_CORE_PREFIX}{pipeline}"),
            revision: Some(revision.to_string()),
            profile: Some(profile.to_string()),
            compute_env: config.compute_env.clone(),
            params_file: params_file.as_ref().map(|file| file.path().to_path_buf()),
            config_file: config.config_file.clone(),
        };

        pipelines.launch(&request)
    }
}

/// Today, formatted the way run output directories are stamped.
fn date_stamp() -> String {
    chrono::Local::now().format("%Y_%m_%d").to_string()
}

/// Output directory for one run: `<base>/<pipeline>/profile_<profile>/<date>`.
fn outdir_for(outdir_base: &str, pipeline: &str, profile: &str, date: &str) -> String {
    let base = outdir_base.trim_end_matches('/');
    format!("{base}/{pipeline}/profile_{profile}/{date}")
}

/// Write a single-key `outdir` params file to a temporary YAML file.
fn write_params_file(outdir: &str) -> Result<NamedTempFile, TowerError> {
    let mut params = BTreeMap::new();
    params.insert("outdir".to_string(), outdir.to_string());

    let yaml = serde_yaml::to_string(&params)
        .map_err(|e| TowerError::Io(std::io::Error::other(e)))?;

    let mut file = tempfile::Builder::new()
        .prefix("params-")
        .suffix(".yaml")
        .tempfile()?;
    file.write_all(yaml.as_bytes())?;

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{CommandExecutor, MockCommandExecutor};
    use std::fs;

    #[test]
    fn test_outdir_is_derived_from_base_pipeline_profile_and_date() {
        assert_eq!(
            outdir_for("/data", "rnaseq", "test", "2024_01_01"),
            "/data/rnaseq/profile_test/2024_01_01"
        );
    }

    #[test]
    fn test_outdir_base_trailing_slash_is_trimmed() {
        assert_eq!(
            outdir_for("s3://bucket/results/", "sarek", "docker", "2024_01_01"),
            "s3://bucket/results/sarek/profile_docker/2024_01_01"
        );
    }

    #[test]
    fn test_params_file_holds_the_generated_outdir() {
        let file = write_params_file("/data/rnaseq/profile_test/2024_01_01").unwrap();
        assert!(file.path().extension().is_some_and(|e| e == "yaml"));

        let contents = fs::read_to_string(file.path()).unwrap();
        let params: BTreeMap<String, String> = serde_yaml::from_str(&contents).unwrap();
        assert_eq!(
            params.get("outdir").map(String::as_str),
            Some("/data/rnaseq/profile_test/2024_01_01")
        );
    }

    #[test]
    fn test_run_launches_every_configured_pipeline() {
        let executor = Arc::new(MockCommandExecutor::new());
        let ctx = Context::test_with(Arc::clone(&executor) as Arc<dyn CommandExecutor>);
        let settings = Settings {
            workspace: "ws1".to_string(),
        };

        let config: LaunchConfig = serde_yaml::from_str(
            "compute-env: aws\nprofile: test\npipelines:\n  rnaseq: \"3.9\"\n  sarek: \"3.2.3\"\noutdir_base: /data\n",
        )
        .unwrap();

        let failures =
            LaunchCommand::run(&ctx, &settings, &config, Path::new("run.yaml")).unwrap();
        assert_eq!(failures, 0);

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][0], "launch");
        assert_eq!(calls[0][1], "https://github.com/nf-core/rnaseq");
        assert!(calls[0].contains(&"--revision=3.9".to_string()));
        assert!(calls[0].contains(&"--profile=test".to_string()));
        assert!(calls[0].contains(&"--compute-env=aws".to_string()));
        assert!(calls[0]
            .iter()
            .any(|arg| arg.starts_with("--params-file=") && arg.ends_with(".yaml")));
        assert_eq!(calls[1][1], "https://github.com/nf-core/sarek");
    }

    #[test]
    fn test_run_without_outdir_base_omits_the_params_file() {
        let executor = Arc::new(MockCommandExecutor::new());
        let ctx = Context::test_with(Arc::clone(&executor) as Arc<dyn CommandExecutor>);
        let settings = Settings {
            workspace: "ws1".to_string(),
        };

        let config: LaunchConfig =
            serde_yaml::from_str("profile: test\npipelines:\n  rnaseq: \"3.9\"\n").unwrap();

        let failures =
            LaunchCommand::run(&ctx, &settings, &config, Path::new("run.yaml")).unwrap();
        assert_eq!(failures, 0);

        let calls = executor.calls();
        assert!(!calls[0].iter().any(|arg| arg.starts_with("--params-file=")));
    }

    #[test]
    fn test_run_requires_a_profile() {
        let ctx = Context::test();
        let settings = Settings {
            workspace: "ws1".to_string(),
        };
        let config: LaunchConfig =
            serde_yaml::from_str("pipelines:\n  rnaseq: \"3.9\"\n").unwrap();

        let err =
            LaunchCommand::run(&ctx, &settings, &config, Path::new("run.yaml")).unwrap_err();
        assert!(matches!(err, TowerError::InvalidConfigFile { .. }));
    }
}
