use anyhow::Result;
use std::process::{Command, Output};

/// Trait for executing system commands, allowing for mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments and return the captured output
    fn execute(&self, program: &str, args: &[String]) -> Result<Output>;
}

/// Real command executor using std::process::Command
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, program: &str, args: &[String]) -> Result<Output> {
        let output = Command::new(program).args(args).output()?;

        Ok(output)
    }
}

/// Mock command executor for testing. Results are matched against a
/// substring of the joined argument list and consumed in order; every
/// invocation is recorded for assertions.
#[cfg(test)]
pub struct MockCommandExecutor {
    outputs: std::sync::Mutex<Vec<MockCommandResult>>,
    calls: std::sync::Mutex<Vec<Vec<String>>>,
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockCommandResult {
    /// Substring the joined argument list must contain
    pub matches: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
impl MockCommandResult {
    pub fn ok(matches: &str, stdout: &str) -> Self {
        Self {
            matches: matches.to_string(),
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(matches: &str, exit_code: i32, stderr: &str) -> Self {
        Self {
            matches: matches.to_string(),
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            outputs: std::sync::Mutex::new(Vec::new()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_outputs(outputs: Vec<MockCommandResult>) -> Self {
        Self {
            outputs: std::sync::Mutex::new(outputs),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// All argument lists this executor was invoked with
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether any recorded invocation contains `needle` in its joined
    /// argument list
    pub fn invoked(&self, needle: &str) -> bool {
        self.calls()
            .iter()
            .any(|args| args.join(" ").contains(needle))
    }
}

#[cfg(test)]
impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, _program: &str, args: &[String]) -> Result<Output> {
        self.calls.lock().unwrap().push(args.to_vec());

        let joined = args.join(" ");
        let mut outputs = self.outputs.lock().unwrap();

        if let Some(index) = outputs.iter().position(|r| joined.contains(&r.matches)) {
            let mock_result = outputs.remove(index);
            return Ok(Output {
                status: create_exit_status(mock_result.exit_code),
                stdout: mock_result.stdout.into_bytes(),
                stderr: mock_result.stderr.into_bytes(),
            });
        }

        // Default: successful empty output
        Ok(Output {
            status: create_exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

#[cfg(test)]
fn create_exit_status(code: i32) -> std::process::ExitStatus {
    // ExitStatus can't be constructed directly; build one from the raw
    // platform representation
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        // wait(2) keeps the exit code in the high byte
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_returns_configured_output() {
        let executor = MockCommandExecutor::with_outputs(vec![MockCommandResult::ok(
            "pipelines list",
            "success",
        )]);

        let args = vec!["pipelines".to_string(), "list".to_string()];
        let output = executor.execute("tw", &args).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "success");
        assert!(output.status.success());
    }

    #[test]
    fn test_mock_executor_reports_exit_code() {
        let executor = MockCommandExecutor::with_outputs(vec![MockCommandResult::failed(
            "pipelines list",
            1,
            "unauthorized",
        )]);

        let args = vec!["pipelines".to_string(), "list".to_string()];
        let output = executor.execute("tw", &args).unwrap();
        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(1));
        assert_eq!(String::from_utf8_lossy(&output.stderr), "unauthorized");
    }

    #[test]
    fn test_mock_executor_records_calls() {
        let executor = MockCommandExecutor::new();

        let args = vec!["compute-envs".to_string(), "list".to_string()];
        executor.execute("tw", &args).unwrap();

        assert_eq!(executor.calls(), vec![args]);
        assert!(executor.invoked("compute-envs list"));
        assert!(!executor.invoked("pipelines"));
    }
}
