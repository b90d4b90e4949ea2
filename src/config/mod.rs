//! Configuration loading and management.
//!
//! Split into logical submodules:
//! - [`types`]: core config struct definitions (`Config`, `ServerConfig`, `EngineConfig`)
//! - [`defaults`]: default-value functions used by `#[serde(default = ...)]`

mod defaults;
mod types;
mod validation;

pub use types::{Config, DatabaseConfig, EngineConfig, LogFormat, MetricsConfig, ServerConfig};
pub use validation::{ValidationError, validate};

use std::path::Path;
use thiserror::Error;

/// Configuration load errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
name = "test-relay"

[database]
path = "relay.db"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.name, "test-relay");
        assert_eq!(config.engine.mask_ttl_secs, 3600);
    }
}
