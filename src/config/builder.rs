use std::path::{Path, PathBuf};

use super::env::ProcessEnv;
use super::file::load_targets_file;
use super::resolve::ConfigResolver;
use super::source::EnvSource;
use super::targets::TargetTable;
use super::ConfigError;
use crate::profile::CompilerSpec;

/// Where the target definitions come from.
#[derive(Debug, Default)]
enum TargetsSource {
    #[default]
    Defaults,
    File(PathBuf),
    Table(TargetTable),
}

/// Builder for a [`ConfigResolver`].
///
/// Without further setup the resolver uses the built-in target table, the
/// default compiler and a snapshot of the process environment taken in
/// [`build`](Self::build).
///
/// The compiler version is chosen in this order: an explicit
/// [`with_compiler_version`](Self::with_compiler_version), the `[compiler]`
/// section of a targets file, then [`CompilerSpec::default`].
///
/// ## Example
///
/// ```no_run
/// use deploy_profiles::config::ConfigResolver;
///
/// let resolver = ConfigResolver::builder()
///     .with_targets_file("deploy/targets.toml")
///     .with_compiler_version("0.8.20")
///     .build()?;
///
/// let profiles = resolver.build_profiles()?;
/// # Ok::<(), deploy_profiles::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ResolverBuilder {
    env: Option<Box<dyn EnvSource>>,
    targets: TargetsSource,
    compiler_version: Option<String>,
}

impl ConfigResolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }
}

impl ResolverBuilder {
    /// Uses `env` for every variable lookup.
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Box::new(env));
        self
    }

    /// Loads target definitions from a TOML file when building.
    ///
    /// The file must exist.
    pub fn with_targets_file(mut self, path: impl AsRef<Path>) -> Self {
        self.targets = TargetsSource::File(path.as_ref().to_path_buf());
        self
    }

    pub fn with_targets(mut self, targets: TargetTable) -> Self {
        self.targets = TargetsSource::Table(targets);
        self
    }

    /// Overrides the compiler version. Validated in [`build`](Self::build).
    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = Some(version.into());
        self
    }

    pub fn build(self) -> Result<ConfigResolver, ConfigError> {
        let (targets, file_compiler) = match self.targets {
            TargetsSource::Defaults => (TargetTable::defaults(), None),
            TargetsSource::Table(table) => (table, None),
            TargetsSource::File(path) => {
                let file = load_targets_file(&path)?;
                tracing::debug!(path = %path.display(), targets = file.targets.len(), "loaded targets file");
                (file.targets, file.compiler)
            }
        };

        let compiler = match self.compiler_version {
            Some(version) => CompilerSpec::new(version)?,
            None => file_compiler.unwrap_or_default(),
        };

        let env = self
            .env
            .unwrap_or_else(|| Box::new(ProcessEnv::snapshot()));

        Ok(ConfigResolver::from_parts(env, targets, compiler))
    }
}
