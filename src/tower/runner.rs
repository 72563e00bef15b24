use crate::error::TowerError;
use crate::traits::CommandExecutor;
use serde_json::Value;
use std::sync::Arc;

/// Name of the platform CLI binary invoked for every operation
pub const TW_BINARY: &str = "tw";

/// Builds and runs `tw` invocations, one child process per call. Output
/// is captured; nothing is cached or retried.
pub struct TowerRunner {
    command: Arc<dyn CommandExecutor>,
}

impl TowerRunner {
    pub fn new(command: Arc<dyn CommandExecutor>) -> Self {
        Self { command }
    }

    /// Run `tw` with the given arguments and return trimmed stdout.
    pub fn run(&self, args: &[String]) -> Result<String, TowerError> {
        let rendered = args.join(" ");

        let output = self.command.execute(TW_BINARY, args).map_err(|e| {
            TowerError::ExternalCommandFailed {
                command: rendered.clone(),
                code: None,
                stderr: e.to_string(),
            }
        })?;

        if !output.status.success() {
            return Err(TowerError::ExternalCommandFailed {
                command: rendered,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run `tw -o json …` and parse stdout as JSON.
    pub fn run_json(&self, args: &[String]) -> Result<Value, TowerError> {
        let mut full = Vec::with_capacity(args.len() + 2);
        full.push("-o".to_string());
        full.push("json".to_string());
        full.extend_from_slice(args);

        let stdout = self.run(&full)?;

        serde_json::from_str(&stdout).map_err(|source| TowerError::InvalidResponseFormat {
            command: args.join(" "),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommandExecutor, MockCommandResult};

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_run_returns_trimmed_stdout() {
        let executor = Arc::new(MockCommandExecutor::with_outputs(vec![
            MockCommandResult::ok("pipelines list", "  some output \n"),
        ]));
        let runner = TowerRunner::new(executor);

        let stdout = runner.run(&args(&["pipelines", "list"])).unwrap();
        assert_eq!(stdout, "some output");
    }

    #[test]
    fn test_run_json_prepends_output_flag() {
        let executor = Arc::new(MockCommandExecutor::with_outputs(vec![
            MockCommandResult::ok("pipelines list", r#"{"pipelines": []}"#),
        ]));
        let runner = TowerRunner::new(Arc::clone(&executor) as Arc<dyn CommandExecutor>);

        runner.run_json(&args(&["pipelines", "list"])).unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(&calls[0][..2], &args(&["-o", "json"])[..]);
    }

    #[test]
    fn test_run_failure_carries_exit_code_and_stderr() {
        let executor = Arc::new(MockCommandExecutor::with_outputs(vec![
            MockCommandResult::failed("pipelines list", 1, "unauthorized"),
        ]));
        let runner = TowerRunner::new(executor);

        let err = runner.run(&args(&["pipelines", "list"])).unwrap_err();
        match err {
            TowerError::ExternalCommandFailed {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "pipelines list");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_json_rejects_non_json_output() {
        let executor = Arc::new(MockCommandExecutor::with_outputs(vec![
            MockCommandResult::ok("pipelines list", "not json at all"),
        ]));
        let runner = TowerRunner::new(executor);

        let err = runner.run_json(&args(&["pipelines", "list"])).unwrap_err();
        assert!(matches!(err, TowerError::InvalidResponseFormat { .. }));
    }
}
