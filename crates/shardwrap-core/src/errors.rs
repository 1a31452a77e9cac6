//! Error types for argument translation and config loading.

use std::path::PathBuf;

/// Translation errors. All of them abort before any command line is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// Flag combination that cannot be satisfied.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// `--workers` value is neither an integer nor `<factor>x`.
    #[error("invalid worker spec {spec:?}: {reason}")]
    InvalidWorkerSpec { spec: String, reason: String },

    /// Value flag at the end of the argument vector, or followed by `--`.
    #[error("flag {flag} expects a value")]
    MissingFlagValue { flag: String },

    /// `--switch=value` given for a flag that takes no value.
    #[error("flag {flag} does not take a value")]
    UnexpectedFlagValue { flag: String },

    /// No positional token to use as the test executable.
    #[error("missing test executable")]
    MissingExecutable,
}

impl TranslateError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_worker_spec(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidWorkerSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

/// Config file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}
