//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::WaiterConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::lifecycle::Signal;

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

/// A validated configuration together with its resolved signal set.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: WaiterConfig,
    pub signals: Vec<Signal>,
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<LoadedConfig, ConfigError> {
    let config: WaiterConfig = toml::from_str(content)?;
    let signals = validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig { config, signals })
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let loaded = parse_config(
            r#"
            [shutdown]
            signals = ["SIGTERM", "hup"]
            timeout_ms = 1500

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(loaded.signals, vec![Signal::Terminate, Signal::Hangup]);
        assert_eq!(loaded.config.shutdown.timeout_ms, 1500);
        assert_eq!(loaded.config.observability.log_level, "debug");
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = parse_config("[shutdown]\nsignals = [\"nope\", \"SIGKILL\"]\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed: "));
        assert!(msg.contains("unknown signal 'nope'"));
        assert!(msg.contains("cannot be caught"));
    }

    #[test]
    fn negative_timeout_is_a_parse_error() {
        let err = parse_config("[shutdown]\ntimeout_ms = -5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("signalx-config-{}.toml", std::process::id()));
        fs::write(&path, "[shutdown]\nsignals = [\"int\"]\ntimeout_ms = 0\n").unwrap();

        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.signals, vec![Signal::Interrupt]);
        assert!(loaded.config.shutdown.timeout().is_zero());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/signalx.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
