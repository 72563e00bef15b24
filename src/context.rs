use crate::traits::{CommandExecutor, RealCommandExecutor};
#[cfg(test)]
use crate::traits::MockCommandExecutor;
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub command: Arc<dyn CommandExecutor>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            command: Arc::new(RealCommandExecutor::new()),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            command: Arc::new(MockCommandExecutor::new()),
        }
    }

    /// Create a test context with a specific command executor
    #[cfg(test)]
    pub fn test_with(command: Arc<dyn CommandExecutor>) -> Self {
        Self { command }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
        }
    }
}
