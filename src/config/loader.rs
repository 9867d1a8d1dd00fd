//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{Environment, HubConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `environment` from the file.
pub const ENVIRONMENT_VAR: &str = "HUB_ENV";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<HubConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let override_value = std::env::var(ENVIRONMENT_VAR).ok();
    parse_config(&content, override_value.as_deref())
}

/// Parse, apply the environment override, and validate.
pub fn parse_config(content: &str, env_override: Option<&str>) -> Result<HubConfig, ConfigError> {
    let mut config: HubConfig = toml::from_str(content)?;

    if let Some(value) = env_override {
        match Environment::from_env_value(value) {
            Some(environment) => config.environment = environment,
            None => tracing::warn!(
                var = ENVIRONMENT_VAR,
                value = %value,
                "Ignoring unrecognized environment override"
            ),
        }
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
environment = "production"

[listener]
bind_address = "127.0.0.1:9000"

[[routing.released_apps]]
id = "justsplit"
name = "JustSplit"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.routing.released_apps.len(), 1);
    }

    #[test]
    fn test_env_override_wins() {
        let config = parse_config("environment = \"development\"", Some("production")).unwrap();
        assert_eq!(config.environment, Environment::Production);

        let config = parse_config("environment = \"development\"", Some("qa")).unwrap();
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_parse_and_validation_errors() {
        assert!(matches!(
            parse_config("environment = 3", None),
            Err(ConfigError::Parse(_))
        ));

        let err = parse_config("[listener]\nbind_address = \"bad\"", None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().contains("invalid bind address"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
