use crate::error::TowerError;

/// Access key the platform CLI authenticates with. The value is read by
/// `tw` itself; towerctl only requires that it is set.
pub const ACCESS_KEY_VAR: &str = "TOWER_ACCESS_KEY";

/// Default workspace when `--workspace` is not given.
pub const WORKSPACE_VAR: &str = "TOWER_WORKSPACE_ID";

/// Run-wide settings resolved once at startup and passed by reference
/// into the commands, instead of reading the environment ad hoc.
#[derive(Debug, Clone)]
pub struct Settings {
    pub workspace: String,
}

impl Settings {
    /// Resolve settings from the `--workspace` flag and the process
    /// environment. The access key must be present; the workspace comes
    /// from the flag, falling back to `TOWER_WORKSPACE_ID`.
    pub fn resolve(workspace_flag: Option<&str>) -> Result<Self, TowerError> {
        Self::resolve_with(workspace_flag, |name| std::env::var(name).ok())
    }

    fn resolve_with(
        workspace_flag: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TowerError> {
        if env(ACCESS_KEY_VAR).is_none() {
            return Err(TowerError::MissingEnvironmentVariable(
                ACCESS_KEY_VAR.to_string(),
            ));
        }

        let workspace = match workspace_flag {
            Some(workspace) => workspace.to_string(),
            None => env(WORKSPACE_VAR).ok_or_else(|| {
                TowerError::MissingEnvironmentVariable(WORKSPACE_VAR.to_string())
            })?,
        };

        Ok(Self { workspace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_workspace_flag_wins_over_environment() {
        let env = env_from(&[(ACCESS_KEY_VAR, "key"), (WORKSPACE_VAR, "env-ws")]);
        let settings =
            Settings::resolve_with(Some("flag-ws"), |name| env.get(name).cloned()).unwrap();
        assert_eq!(settings.workspace, "flag-ws");
    }

    #[test]
    fn test_workspace_falls_back_to_environment() {
        let env = env_from(&[(ACCESS_KEY_VAR, "key"), (WORKSPACE_VAR, "env-ws")]);
        let settings = Settings::resolve_with(None, |name| env.get(name).cloned()).unwrap();
        assert_eq!(settings.workspace, "env-ws");
    }

    #[test]
    fn test_missing_workspace_is_an_error() {
        let env = env_from(&[(ACCESS_KEY_VAR, "key")]);
        let err = Settings::resolve_with(None, |name| env.get(name).cloned()).unwrap_err();
        match err {
            TowerError::MissingEnvironmentVariable(name) => assert_eq!(name, WORKSPACE_VAR),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_access_key_is_an_error() {
        let env = env_from(&[(WORKSPACE_VAR, "env-ws")]);
        let err = Settings::resolve_with(None, |name| env.get(name).cloned()).unwrap_err();
        match err {
            TowerError::MissingEnvironmentVariable(name) => assert_eq!(name, ACCESS_KEY_VAR),
            other => panic!("unexpected error: {other}"),
        }
    }
}
