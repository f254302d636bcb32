//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{CodeList, ConsoleConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file settings.
pub const ENV_BASE_URL: &str = "SERVICE_BASE_URL";
pub const ENV_SUCCESS_CODES: &str = "SERVICE_SUCCESS_CODE";
pub const ENV_LOGOUT_CODES: &str = "SERVICE_LOGOUT_CODES";
pub const ENV_MODAL_LOGOUT_CODES: &str = "SERVICE_MODAL_LOGOUT_CODES";
pub const ENV_EXPIRED_TOKEN_CODES: &str = "SERVICE_EXPIRED_TOKEN_CODES";

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
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the process environment, and validate a TOML file.
pub fn load_config(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ConsoleConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, std::env::vars());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Defaults plus environment overrides, validated. Used when no file is given.
pub fn load_from_env() -> Result<ConsoleConfig, ConfigError> {
    let mut config = ConsoleConfig::default();
    apply_env_overrides(&mut config, std::env::vars());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `SERVICE_*` overrides. Unknown keys are ignored.
pub fn apply_env_overrides<I, K, V>(config: &mut ConsoleConfig, vars: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in vars {
        let value = value.as_ref();
        let service = &mut config.service;
        match key.as_ref() {
            ENV_BASE_URL => service.base_url = value.trim().to_string(),
            ENV_SUCCESS_CODES => service.success_codes = CodeList::from_csv(value),
            ENV_LOGOUT_CODES => service.logout_codes = CodeList::from_csv(value),
            ENV_MODAL_LOGOUT_CODES => service.modal_logout_codes = CodeList::from_csv(value),
            ENV_EXPIRED_TOKEN_CODES => service.expired_token_codes = CodeList::from_csv(value),
            _ => continue,
        }
        tracing::debug!(key = key.as_ref(), "Applied environment override");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_replace_code_sets() {
        let mut config = ConsoleConfig::default();
        apply_env_overrides(
            &mut config,
            [
                (ENV_SUCCESS_CODES, "0000, 200"),
                (ENV_LOGOUT_CODES, "9999"),
                ("UNRELATED", "x"),
            ],
        );
        assert_eq!(config.service.success_codes, CodeList::from_csv("0000,200"));
        assert_eq!(config.service.logout_codes, CodeList::from_csv("9999"));
    }

    #[test]
    fn test_load_config_rejects_overlap() {
        let path = std::env::temp_dir().join(format!("console-request-{}.toml", uuid::Uuid::new_v4()));
        fs::write(
            &path,
            r#"
            [service]
            base_url = "http://localhost:9000"
            logout_codes = "1001"
            expired_token_codes = "1001"
            "#,
        )
        .unwrap();

        let err = load_config(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("1001"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/console-request.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
