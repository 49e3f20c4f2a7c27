//! Environment sources, target definitions and profile resolution.

mod builder;
mod env;
mod error;
mod file;
mod resolve;
mod source;
mod targets;

pub use builder::ResolverBuilder;
pub use env::ProcessEnv;
pub use error::ConfigError;
pub use file::load_targets_file;
pub use resolve::ConfigResolver;
pub use source::{EnvSource, MapEnv};
pub use targets::{EndpointSpec, NetworkIdSpec, TargetSpec, TargetTable, TargetsFile};
