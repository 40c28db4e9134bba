//! libSQL database configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_path() -> String {
    ".folio/folio.db".to_string()
}

const fn default_seed_defaults() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file. `:memory:` opens a throwaway database.
    #[serde(default = "default_path")]
    pub path: String,

    /// Whether opening the database installs the default roles and the
    /// default workflow transitions.
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            seed_defaults: default_seed_defaults(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.path.trim().is_empty()
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// The database path, or `NotConfigured` when it is blank.
    pub fn resolved_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "database".into(),
            });
        }
        Ok(PathBuf::from(&self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_project_dir() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".folio/folio.db");
        assert!(config.seed_defaults);
        assert!(config.is_configured());
        assert!(!config.is_in_memory());
    }

    #[test]
    fn blank_path_is_not_configured() {
        let config = DatabaseConfig {
            path: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.resolved_path(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }
}
