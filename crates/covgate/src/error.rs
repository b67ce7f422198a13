//! Error types for covgate
//!
//! A failing external command is never an error here: it is a step outcome
//! carrying an exit code. These variants cover the things that stop the
//! runner from doing its job at all.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for covgate operations
pub type CovResult<T> = Result<T, CovError>;

/// Errors that can occur while configuring or driving the pipeline
#[derive(Debug, Error)]
pub enum CovError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// The shell itself could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command line that was being run
        command: String,
        /// Underlying spawn failure
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigFile {
        /// Path of the config file
        path: PathBuf,
        /// Underlying read failure
        #[source]
        source: std::io::Error,
    },

    /// YAML config parse error
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CovError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a spawn error for `command`
    #[must_use]
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CovError::config("threshold out of range");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("threshold out of range"));
    }

    #[test]
    fn test_spawn_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no sh");
        let err = CovError::spawn("go test ./...", io_err);
        let msg = err.to_string();
        assert!(msg.contains("go test ./..."));
        assert!(msg.contains("no sh"));
    }

    #[test]
    fn test_config_file_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CovError::ConfigFile {
            path: PathBuf::from("covgate.yaml"),
            source: io_err,
        };
        assert!(err.to_string().contains("covgate.yaml"));
    }

    #[test]
    fn test_yaml_error_from() {
        let yaml_err = serde_yaml_ng::from_str::<u32>("[not a number").unwrap_err();
        let err: CovError = yaml_err.into();
        assert!(err.to_string().contains("YAML"));
    }
}
