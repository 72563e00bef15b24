use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while talking to the platform CLI or preparing a run.
#[derive(Debug, Error)]
pub enum TowerError {
    #[error("required environment variable '{0}' is not set")]
    MissingEnvironmentVariable(String),

    #[error("invalid config file '{}': {reason}", .path.display())]
    InvalidConfigFile { path: PathBuf, reason: String },

    #[error("command 'tw {command}' failed{}: {stderr}", .code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    ExternalCommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("expected JSON output from 'tw {command}': {source}")]
    InvalidResponseFormat {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource '{0}' already exists in the workspace")]
    ResourceAlreadyExists(String),

    #[error("could not find '{0}' in the workspace")]
    ResourceNotFound(String),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TowerError {
    /// Process exit code for a run aborted by this error: 1 for
    /// configuration and usage problems, 2 for failed operations.
    pub fn exit_code(&self) -> i32 {
        match self {
            TowerError::MissingEnvironmentVariable(_)
            | TowerError::InvalidConfigFile { .. }
            | TowerError::Usage(_) => 1,
            _ => 2,
        }
    }
}
