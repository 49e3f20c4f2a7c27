use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing required configuration: {key}")]
    MissingConfiguration { key: String },

    #[error("environment variable name must not be empty")]
    InvalidKey,

    #[error("unclosed reference (missing '}}') in endpoint of target '{target}'")]
    UnclosedReference { target: String },

    #[error("invalid compiler version '{0}' (expected MAJOR.MINOR.PATCH)")]
    InvalidCompilerVersion(String),

    #[error("no deployment targets defined")]
    NoTargets,

    #[error("invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("required targets file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read targets file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse targets file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to deserialize targets: {0}")]
    DeserializeError(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        ConfigError::MissingConfiguration { key: key.into() }
    }

    pub(crate) fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Returns the variable name for [`ConfigError::MissingConfiguration`].
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            ConfigError::MissingConfiguration { key } => Some(key),
            _ => None,
        }
    }
}
