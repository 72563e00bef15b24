use super::runner::TowerRunner;
use crate::error::TowerError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapper for the `tw pipelines` and `tw launch` commands, scoped to a
/// single workspace. Every method is one formatting step over the runner.
pub struct Pipelines<'a> {
    runner: &'a TowerRunner,
    workspace: String,
}

/// Parameters for a repository-based launch, as driven by a run config.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub repository: String,
    pub revision: Option<String>,
    pub profile: Option<String>,
    pub compute_env: Option<String>,
    pub params_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

impl<'a> Pipelines<'a> {
    const CMD: &'static str = "pipelines";

    pub fn new(runner: &'a TowerRunner, workspace: &str) -> Self {
        Self {
            runner,
            workspace: workspace.to_string(),
        }
    }

    /// List pipelines in the workspace
    pub fn list(&self) -> Result<Value, TowerError> {
        self.runner.run_json(&[
            Self::CMD.to_string(),
            "list".to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])
    }

    /// View a pipeline
    pub fn view(&self, name: &str) -> Result<Value, TowerError> {
        self.runner.run_json(&[
            Self::CMD.to_string(),
            "view".to_string(),
            "--name".to_string(),
            name.to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])
    }

    /// Delete a pipeline
    pub fn delete(&self, name: &str) -> Result<(), TowerError> {
        self.runner.run(&[
            Self::CMD.to_string(),
            "delete".to_string(),
            "--name".to_string(),
            name.to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])?;
        Ok(())
    }

    /// Export a pipeline to `<workspace>/<name>.json` and return the path
    pub fn export(&self, name: &str) -> Result<PathBuf, TowerError> {
        let workspace_dir = Path::new(&self.workspace);
        fs::create_dir_all(workspace_dir)?;

        let outfile = workspace_dir.join(format!("{name}.json"));

        self.runner.run(&[
            Self::CMD.to_string(),
            "export".to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
            "--name".to_string(),
            name.to_string(),
            outfile.display().to_string(),
        ])?;

        Ok(outfile)
    }

    /// Import a pipeline from an exported JSON file
    pub fn import(&self, name: &str, config: &Path) -> Result<(), TowerError> {
        self.runner.run(&[
            Self::CMD.to_string(),
            "import".to_string(),
            "--name".to_string(),
            name.to_string(),
            config.display().to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])?;
        Ok(())
    }

    /// Add a pipeline to the workspace from a repository
    pub fn add(
        &self,
        name: &str,
        params_file: Option<&Path>,
        repository: &str,
    ) -> Result<(), TowerError> {
        let mut args = vec![
            Self::CMD.to_string(),
            "add".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];
        if let Some(params_file) = params_file {
            args.push("--params-file".to_string());
            args.push(params_file.display().to_string());
        }
        args.push(repository.to_string());
        args.push("--workspace".to_string());
        args.push(self.workspace.clone());

        self.runner.run(&args)?;
        Ok(())
    }

    /// Launch a pipeline that already exists in the launchpad
    pub fn launch_by_name(
        &self,
        name: &str,
        params_file: Option<&Path>,
    ) -> Result<String, TowerError> {
        let mut args = vec![
            "launch".to_string(),
            name.to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ];
        if let Some(params_file) = params_file {
            args.push("--params-file".to_string());
            args.push(params_file.display().to_string());
        }

        self.runner.run(&args)
    }

    /// Launch a pipeline straight from a repository with the revision,
    /// profile and compute environment of a run config
    pub fn launch(&self, request: &LaunchRequest) -> Result<String, TowerError> {
        let mut args = vec![
            "launch".to_string(),
            request.repository.clone(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ];
        if let Some(revision) = &request.revision {
            args.push(format!("--revision={revision}"));
        }
        if let Some(profile) = &request.profile {
            args.push(format!("--profile={profile}"));
        }
        if let Some(compute_env) = &request.compute_env {
            args.push(format!("--compute-env={compute_env}"));
        }
        if let Some(params_file) = &request.params_file {
            args.push(format!("--params-file={}", params_file.display()));
        }
        if let Some(config_file) = &request.config_file {
            args.push(format!("--config={}", config_file.display()));
        }

        self.runner.run(&args)
    }
}
