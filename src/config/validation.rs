//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("engine.mask_universe must not be empty")]
    EmptyMaskUniverse,
    #[error("engine.mask_universe contains a duplicate mask: {0}")]
    DuplicateMask(String),
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    if config.engine.mask_universe.is_empty() {
        errors.push(ValidationError::EmptyMaskUniverse);
    } else {
        let mut seen = std::collections::HashSet::new();
        for mask in &config.engine.mask_universe {
            if !seen.insert(mask) {
                errors.push(ValidationError::DuplicateMask(mask.clone()));
            }
        }
    }

    if config.database.path != ":memory:" {
        let db_path = Path::new(&config.database.path);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ValidationError::DatabasePathInvalid(config.database.path.clone()));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> Config {
        toml::from_str(
            r#"
[server]
name = "test-relay"

[database]
path = ":memory:"
"#,
        )
        .unwrap()
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&minimal_valid_config()).is_ok());
    }

    #[test]
    fn empty_server_name_fails() {
        let mut config = minimal_valid_config();
        config.server.name.clear();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingServerName)));
    }

    #[test]
    fn duplicate_mask_fails() {
        let mut config = minimal_valid_config();
        config.engine.mask_universe = vec!["🐶".into(), "🐶".into()];
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateMask(_))));
    }
}
