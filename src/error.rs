use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the deploy-profiles library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("deployment config requires resolved profiles")]
    MissingProfiles,

    #[error("unknown deployment target: {0}")]
    UnknownTarget(String),
}
