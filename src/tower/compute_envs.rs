use super::runner::TowerRunner;
use crate::error::TowerError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapper for the `tw compute-envs` command, scoped to a workspace.
pub struct ComputeEnvs<'a> {
    runner: &'a TowerRunner,
    workspace: String,
}

impl<'a> ComputeEnvs<'a> {
    const CMD: &'static str = "compute-envs";

    pub fn new(runner: &'a TowerRunner, workspace: &str) -> Self {
        Self {
            runner,
            workspace: workspace.to_string(),
        }
    }

    /// List compute environments in the workspace
    pub fn list(&self) -> Result<Value, TowerError> {
        self.runner.run_json(&[
            Self::CMD.to_string(),
            "list".to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])
    }

    /// View a compute environment
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

    /// Delete a compute environment
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

    /// Export a compute environment to `<workspace>/<name>.json` and
    /// return the path
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

    /// Import a compute environment from an exported JSON file using
    /// named credentials
    pub fn import(&self, name: &str, config: &Path, credentials: &str) -> Result<(), TowerError> {
        self.runner.run(&[
            Self::CMD.to_string(),
            "import".to_string(),
            "--name".to_string(),
            name.to_string(),
            config.display().to_string(),
            "--credentials".to_string(),
            credentials.to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])?;
        Ok(())
    }

    /// Set a compute environment as the workspace primary
    pub fn set_primary(&self, name: &str) -> Result<(), TowerError> {
        self.runner.run(&[
            Self::CMD.to_string(),
            "primary".to_string(),
            "set".to_string(),
            "--name".to_string(),
            name.to_string(),
            "--workspace".to_string(),
            self.workspace.clone(),
        ])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{CommandExecutor, MockCommandExecutor, MockCommandResult};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn runner_with(executor: &Arc<MockCommandExecutor>) -> TowerRunner {
        TowerRunner::new(Arc::clone(executor) as Arc<dyn CommandExecutor>)
    }

    #[test]
    fn test_list_requests_json_scoped_to_workspace() {
        let executor = Arc::new(MockCommandExecutor::with_outputs(vec![
            MockCommandResult::ok("compute-envs list", r#"{"computeEnvs": []}"#),
        ]));
        let runner = runner_with(&executor);
        let compute_envs = ComputeEnvs::new(&runner, "ws1");

        compute_envs.list().unwrap();

        let calls = executor.calls();
        assert_eq!(
            calls[0],
            ["-o", "json", "compute-envs", "list", "--workspace", "ws1"]
        );
    }

    #[test]
    fn test_import_passes_credentials() {
        let executor = Arc::new(MockCommandExecutor::new());
        let runner = runner_with(&executor);
        let compute_envs = ComputeEnvs::new(&runner, "ws1");

        compute_envs
            .import("ce1", Path::new("ce1.json"), "aws-creds")
            .unwrap();

        let calls = executor.calls();
        assert_eq!(
            calls[0],
            [
                "compute-envs",
                "import",
                "--name",
                "ce1",
                "ce1.json",
                "--credentials",
                "aws-creds",
                "--workspace",
                "ws1",
            ]
        );
    }

    #[test]
    fn test_export_creates_workspace_directory() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path().join("ws1").display().to_string();

        let executor = Arc::new(MockCommandExecutor::new());
        let runner = runner_with(&executor);
        let compute_envs = ComputeEnvs::new(&runner, &workspace);

        let outfile = compute_envs.export("ce1").unwrap();

        assert!(dir.path().join("ws1").is_dir());
        assert!(outfile.ends_with("ce1.json"));
        assert!(executor.invoked("compute-envs export"));
    }

    #[test]
    fn test_set_primary() {
        let executor = Arc::new(MockCommandExecutor::new());
        let runner = runner_with(&executor);
        let compute_envs = ComputeEnvs::new(&runner, "ws1");

        compute_envs.set_primary("ce1").unwrap();

        let calls = executor.calls();
        assert_eq!(
            calls[0],
            [
                "compute-envs",
                "primary",
                "set",
                "--name",
                "ce1",
                "--workspace",
                "ws1",
            ]
        );
    }
}
