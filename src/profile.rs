//! Resolved deployment profiles and the global compiler specification.

use std::fmt;

use crate::config::ConfigError;

/// Where a deployment target is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A remote RPC endpoint.
    Remote { url: String },
    /// A local node addressed by host and port.
    Local { host: String, port: u16 },
}

impl Endpoint {
    /// Returns the endpoint URL for remote targets.
    pub fn url(&self) -> Option<&str> {
        match self {
            Endpoint::Remote { url } => Some(url),
            Endpoint::Local { .. } => None,
        }
    }

    /// Returns `(host, port)` for local targets.
    pub fn host_port(&self) -> Option<(&str, u16)> {
        match self {
            Endpoint::Local { host, port } => Some((host, *port)),
            Endpoint::Remote { .. } => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Endpoint::Local { .. })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Remote { url } => f.write_str(url),
            Endpoint::Local { host, port } => write!(f, "{host}:{port}"),
        }
    }
}

/// Chain identifier of a deployment target.
///
/// Values read from the environment are kept verbatim as [`NetworkId::Text`];
/// numeric ids only appear when a target definition embeds a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkId {
    /// Matches any network (`*`).
    Any,
    Numeric(u64),
    Text(String),
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkId::Any => f.write_str("*"),
            NetworkId::Numeric(id) => write!(f, "{id}"),
            NetworkId::Text(id) => f.write_str(id),
        }
    }
}

impl PartialEq<str> for NetworkId {
    fn eq(&self, other: &str) -> bool {
        match self {
            NetworkId::Any => other == "*",
            NetworkId::Numeric(id) => other.parse::<u64>().is_ok_and(|o| o == *id),
            NetworkId::Text(id) => id == other,
        }
    }
}

impl PartialEq<&str> for NetworkId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Opaque handle to a signing credential.
///
/// The secret is only reachable through [`expose`](Self::expose). `Debug` and
/// `Display` print the variable name it was resolved from.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRef {
    key: String,
    secret: String,
}

impl CredentialRef {
    pub(crate) fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Name of the environment variable the credential came from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the raw secret for injection into a signer.
    pub fn expose(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRef")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.key)
    }
}

/// A fully resolved deployment target.
///
/// Profiles are only produced by [`ConfigResolver::build_profiles`] and cannot
/// be modified afterwards.
///
/// [`ConfigResolver::build_profiles`]: crate::ConfigResolver::build_profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentProfile {
    name: String,
    endpoint: Endpoint,
    credential: Option<CredentialRef>,
    network_id: NetworkId,
    gas_limit: Option<u64>,
    gas_price: Option<u64>,
    skip_dry_run: bool,
}

impl DeploymentProfile {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        endpoint: Endpoint,
        credential: Option<CredentialRef>,
        network_id: NetworkId,
        gas_limit: Option<u64>,
        gas_price: Option<u64>,
        skip_dry_run: bool,
    ) -> Self {
        Self {
            name,
            endpoint,
            credential,
            network_id,
            gas_limit,
            gas_price,
            skip_dry_run,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Shorthand for `endpoint().url()`.
    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint.url()
    }

    /// Signing credential; `None` for local targets.
    pub fn credential(&self) -> Option<&CredentialRef> {
        self.credential.as_ref()
    }

    pub fn network_id(&self) -> &NetworkId {
        &self.network_id
    }

    pub fn gas_limit(&self) -> Option<u64> {
        self.gas_limit
    }

    pub fn gas_price(&self) -> Option<u64> {
        self.gas_price
    }

    pub fn skip_dry_run(&self) -> bool {
        self.skip_dry_run
    }
}

/// Compiler applied to every deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSpec {
    name: String,
    version: String,
}

impl CompilerSpec {
    pub const DEFAULT_NAME: &'static str = "solc";
    pub const DEFAULT_VERSION: &'static str = "0.8.14";

    /// Creates a `solc` spec, validating that `version` is `MAJOR.MINOR.PATCH`.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_name(Self::DEFAULT_NAME, version)
    }

    pub fn with_name(
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let version = version.into();
        if !is_well_formed_version(&version) {
            return Err(ConfigError::InvalidCompilerVersion(version));
        }
        Ok(Self {
            name: name.into(),
            version,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for CompilerSpec {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            version: Self::DEFAULT_VERSION.to_string(),
        }
    }
}

impl fmt::Display for CompilerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Three dot-separated numeric components without leading zeros.
fn is_well_formed_version(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    parts.len() == 3
        && parts.iter().all(|p| {
            !p.is_empty()
                && p.chars().all(|c| c.is_ascii_digit())
                && (p.len() == 1 || !p.starts_with('0'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compiler_is_valid() {
        let spec = CompilerSpec::default();
        assert_eq!(spec.version(), "0.8.14");
        assert_eq!(CompilerSpec::new(spec.version()).unwrap(), spec);
    }

    #[test]
    fn test_malformed_compiler_versions() {
        for version in ["", "0.8", "0.8.x", "v0.8.14", "0.08.1", "1.2.3.4", "1..2"] {
            assert!(
                matches!(
                    CompilerSpec::new(version),
                    Err(ConfigError::InvalidCompilerVersion(ref v)) if v == version
                ),
                "{version} should be rejected"
            );
        }
    }

    #[test]
    fn test_credential_debug_hides_secret() {
        let credential = CredentialRef::new("MAIN_WALLET_PRIVATE", "0xdeadbeef");
        let debug = format!("{credential:?}");

        assert!(debug.contains("MAIN_WALLET_PRIVATE"));
        assert!(!debug.contains("0xdeadbeef"));
        assert_eq!(credential.to_string(), "$MAIN_WALLET_PRIVATE");
        assert_eq!(credential.expose(), "0xdeadbeef");
    }

    #[test]
    fn test_network_id_comparisons() {
        assert_eq!(NetworkId::Any, "*");
        assert_eq!(NetworkId::Numeric(9000), "9000");
        assert_eq!(NetworkId::Text("1".into()), "1");
        assert_ne!(NetworkId::Text("01".into()), "1");
        assert_eq!(NetworkId::Any.to_string(), "*");
    }

    #[test]
    fn test_endpoint_display() {
        let local = Endpoint::Local {
            host: "127.0.0.1".into(),
            port: 7545,
        };
        assert_eq!(local.to_string(), "127.0.0.1:7545");
        assert_eq!(local.host_port(), Some(("127.0.0.1", 7545)));
        assert!(local.url().is_none());
    }
}
