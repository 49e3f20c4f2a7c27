//! The resolved configuration handed to a deployment runner.

use std::collections::BTreeMap;

use crate::config::ConfigResolver;
use crate::profile::{CompilerSpec, DeploymentProfile};
use crate::Error;

/// Resolved deployment profiles plus the compiler they are built with.
///
/// Built once at startup and only read afterwards.
///
/// ## Example
///
/// ```no_run
/// use deploy_profiles::config::{ConfigResolver, ProcessEnv};
/// use deploy_profiles::DeployConfig;
///
/// let resolver = ConfigResolver::new(ProcessEnv::snapshot());
/// let config = DeployConfig::resolve(&resolver)?;
///
/// let main = config.profile("main")?;
/// println!("{} via {}", main.name(), main.endpoint());
/// # Ok::<(), deploy_profiles::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    profiles: BTreeMap<String, DeploymentProfile>,
    compiler: CompilerSpec,
}

impl DeployConfig {
    /// Creates a new builder for constructing a `DeployConfig`.
    pub fn builder() -> DeployConfigBuilder {
        DeployConfigBuilder::default()
    }

    /// Resolves every target of `resolver` in one pass.
    pub fn resolve(resolver: &ConfigResolver) -> Result<Self, Error> {
        Self::builder()
            .with_profiles(resolver.build_profiles()?)
            .with_compiler(resolver.compiler_spec().clone())
            .build()
    }

    pub fn profiles(&self) -> &BTreeMap<String, DeploymentProfile> {
        &self.profiles
    }

    /// Looks up a single target by name.
    pub fn profile(&self, name: &str) -> Result<&DeploymentProfile, Error> {
        self.profiles
            .get(name)
            .ok_or_else(|| Error::UnknownTarget(name.to_string()))
    }

    pub fn compiler(&self) -> &CompilerSpec {
        &self.compiler
    }
}

/// Builder for constructing a [`DeployConfig`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct DeployConfigBuilder {
    profiles: Option<BTreeMap<String, DeploymentProfile>>,
    compiler: Option<CompilerSpec>,
}

impl DeployConfigBuilder {
    /// Attaches the output of [`ConfigResolver::build_profiles`].
    pub fn with_profiles(mut self, profiles: BTreeMap<String, DeploymentProfile>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn with_compiler(mut self, compiler: CompilerSpec) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Builds the `DeployConfig`.
    ///
    /// Returns an error if no profiles were provided. The compiler falls back
    /// to [`CompilerSpec::default`].
    pub fn build(self) -> Result<DeployConfig, Error> {
        Ok(DeployConfig {
            profiles: self.profiles.ok_or(Error::MissingProfiles)?,
            compiler: self.compiler.unwrap_or_default(),
        })
    }
}
