//! Content listing configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_page_size() -> u32 {
    10
}

const fn default_max_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    /// Page size used when a listing does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound on any requested page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl ContentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "content.default_page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue {
                field: "content.default_page_size".into(),
                reason: format!("exceeds max_page_size ({})", self.max_page_size),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ContentConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_above_max_is_invalid() {
        let config = ContentConfig {
            default_page_size: 500,
            max_page_size: 100,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn zero_page_size_is_invalid() {
        let config = ContentConfig {
            default_page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
