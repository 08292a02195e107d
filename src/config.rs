use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Module parameters, loadable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HubConfig {
    /// Master switch for the deferral machinery. When off, every packet
    /// takes the normal settlement path.
    pub rollapps_enabled: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            rollapps_enabled: true,
        }
    }
}

impl HubConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_rollapps() {
        assert!(HubConfig::default().rollapps_enabled);
        assert_eq!(HubConfig::from_toml_str("").unwrap(), HubConfig::default());
    }

    #[test]
    fn parses_overrides() {
        let config = HubConfig::from_toml_str("rollapps_enabled = false").unwrap();
        assert!(!config.rollapps_enabled);
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            HubConfig::from_toml_str("rollapps_enabled = \"maybe\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
