//! Resolution of target definitions into deployment profiles.
//!
//! Every value taken from the environment goes through
//! [`ConfigResolver::require_env`], including `${VAR}` references embedded in
//! literal endpoint URLs. Use `$$` in a URL to produce a literal `$`.

use std::collections::BTreeMap;

use super::source::EnvSource;
use super::targets::{EndpointSpec, NetworkIdSpec, TargetSpec, TargetTable};
use super::ConfigError;
use crate::profile::{CompilerSpec, CredentialRef, DeploymentProfile, Endpoint, NetworkId};

/// A piece of an endpoint URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Reference(String),
}

/// Resolves a [`TargetTable`] against an environment source.
///
/// Resolution is a single all-or-nothing pass: either every target resolves
/// or none is returned.
///
/// ```
/// use deploy_profiles::config::{ConfigResolver, MapEnv, TargetSpec, TargetTable};
///
/// let targets = TargetTable::new(vec![TargetSpec::local("dev", "127.0.0.1", 7545)])?;
/// let resolver = ConfigResolver::builder()
///     .with_env(MapEnv::new())
///     .with_targets(targets)
///     .build()?;
///
/// let profiles = resolver.build_profiles()?;
/// assert_eq!(profiles["dev"].endpoint().to_string(), "127.0.0.1:7545");
/// # Ok::<(), deploy_profiles::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct ConfigResolver {
    env: Box<dyn EnvSource>,
    targets: TargetTable,
    compiler: CompilerSpec,
}

impl ConfigResolver {
    pub(crate) fn from_parts(
        env: Box<dyn EnvSource>,
        targets: TargetTable,
        compiler: CompilerSpec,
    ) -> Self {
        Self {
            env,
            targets,
            compiler,
        }
    }

    /// Creates a resolver for the default targets and compiler over `env`.
    pub fn new(env: impl EnvSource + 'static) -> Self {
        Self::from_parts(Box::new(env), TargetTable::defaults(), CompilerSpec::default())
    }

    /// Looks up a required variable.
    ///
    /// A variable that is set to the empty string counts as present.
    pub fn require_env(&self, key: &str) -> Result<String, ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::InvalidKey);
        }
        self.env.get(key).ok_or_else(|| ConfigError::missing(key))
    }

    /// Resolves every target in the table.
    ///
    /// Fails on the first missing variable, in table order.
    pub fn build_profiles(&self) -> Result<BTreeMap<String, DeploymentProfile>, ConfigError> {
        let mut profiles = BTreeMap::new();

        for spec in self.targets.iter() {
            let profile = self.resolve_target(spec)?;
            tracing::debug!(
                name = profile.name(),
                local = profile.endpoint().is_local(),
                network_id = %profile.network_id(),
                "resolved deployment target"
            );
            profiles.insert(spec.name().to_string(), profile);
        }

        tracing::info!(targets = profiles.len(), "deployment profiles resolved");
        Ok(profiles)
    }

    pub fn compiler_spec(&self) -> &CompilerSpec {
        &self.compiler
    }

    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    /// Every variable the resolver depends on, deduplicated, in table order.
    pub fn required_keys(&self) -> Vec<String> {
        self.targets.required_keys()
    }

    /// The required variables that the environment does not provide.
    pub fn missing_keys(&self) -> Vec<String> {
        self.required_keys()
            .into_iter()
            .filter(|key| self.env.get(key).is_none())
            .collect()
    }

    fn resolve_target(&self, spec: &TargetSpec) -> Result<DeploymentProfile, ConfigError> {
        let endpoint = match spec.endpoint() {
            EndpointSpec::Local { host, port } => Endpoint::Local {
                host: host.clone(),
                port: *port,
            },
            EndpointSpec::Env(key) => Endpoint::Remote {
                url: self.require_env(key)?,
            },
            EndpointSpec::Url(template) => Endpoint::Remote {
                url: self.expand_template(spec.name(), template)?,
            },
        };

        let credential = spec
            .credential_env()
            .map(|key| Ok::<_, ConfigError>(CredentialRef::new(key, self.require_env(key)?)))
            .transpose()?;

        let network_id = match spec.network_id() {
            NetworkIdSpec::Literal(id) => id.clone(),
            NetworkIdSpec::Env(key) => NetworkId::Text(self.require_env(key)?),
        };

        Ok(DeploymentProfile::new(
            spec.name().to_string(),
            endpoint,
            credential,
            network_id,
            spec.gas_limit(),
            spec.gas_price(),
            spec.skip_dry_run(),
        ))
    }

    fn expand_template(&self, target: &str, template: &str) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(template.len());
        for segment in parse_template(target, template)? {
            match segment {
                Segment::Literal(text) => result.push_str(&text),
                Segment::Reference(key) => result.push_str(&self.require_env(&key)?),
            }
        }
        Ok(result)
    }
}

/// Splits a URL template into literal text and `${VAR}` references.
pub(crate) fn parse_template(target: &str, template: &str) -> Result<Vec<Segment>, ConfigError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            literal.push(ch);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                literal.push('$');
            }
            Some('{') => {
                chars.next();
                let key = consume_until(&mut chars, '}').ok_or_else(|| {
                    ConfigError::UnclosedReference {
                        target: target.to_string(),
                    }
                })?;
                if key.is_empty() {
                    return Err(ConfigError::InvalidKey);
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Reference(key));
            }
            _ => literal.push('$'),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn consume_until(chars: &mut std::iter::Peekable<std::str::Chars>, delim: char) -> Option<String> {
    let mut result = String::new();
    for ch in chars.by_ref() {
        if ch == delim {
            return Some(result);
        }
        result.push(ch);
    }
    None
}
