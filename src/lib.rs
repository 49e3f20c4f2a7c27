//! Typed, validated deployment configuration.
//!
//! Required endpoints and signing credentials are read from an injected
//! environment source, checked eagerly, and assembled into immutable
//! per-target [`DeploymentProfile`]s.

pub mod config;
pub mod context;
mod error;
pub mod profile;

pub use config::{ConfigError, ConfigResolver};
pub use context::DeployConfig;
pub use error::Error;
pub use profile::{CompilerSpec, CredentialRef, DeploymentProfile, Endpoint, NetworkId};
