//! Declarative deployment-target definitions.
//!
//! A [`TargetTable`] describes where each target's values come from. It holds
//! no secrets itself; the resolver turns it into profiles.
//!
//! Tables can be written in TOML:
//!
//! ```toml
//! [compiler]
//! version = "0.8.14"
//!
//! [[targets]]
//! name = "dev"
//! host = "127.0.0.1"
//! port = 7545
//! skip_dry_run = true
//!
//! [[targets]]
//! name = "main"
//! url_env = "MAIN_URL"
//! credential_env = "MAIN_WALLET_PRIVATE"
//! network_id_env = "MAIN_NETWORK_ID"
//! gas_limit = 2900000
//! gas_price = 35000000000
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use super::resolve::{parse_template, Segment};
use super::ConfigError;
use crate::profile::{CompilerSpec, NetworkId};

/// Where a target's endpoint comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSpec {
    Local { host: String, port: u16 },
    /// URL read verbatim from an environment variable.
    Env(String),
    /// Literal URL, possibly containing `${VAR}` references.
    Url(String),
}

/// Where a target's network id comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkIdSpec {
    Literal(NetworkId),
    Env(String),
}

impl Default for NetworkIdSpec {
    fn default() -> Self {
        NetworkIdSpec::Literal(NetworkId::Any)
    }
}

/// Definition of a single deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    name: String,
    endpoint: EndpointSpec,
    credential_env: Option<String>,
    network_id: NetworkIdSpec,
    gas_limit: Option<u64>,
    gas_price: Option<u64>,
    skip_dry_run: bool,
}

impl TargetSpec {
    /// A local node target. Local targets never need a credential.
    pub fn local(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self::from_endpoint(
            name,
            EndpointSpec::Local {
                host: host.into(),
                port,
            },
            None,
        )
    }

    /// A remote target signed with the credential in `credential_env`.
    pub fn remote(
        name: impl Into<String>,
        endpoint: EndpointSpec,
        credential_env: impl Into<String>,
    ) -> Self {
        Self::from_endpoint(name, endpoint, Some(credential_env.into()))
    }

    fn from_endpoint(
        name: impl Into<String>,
        endpoint: EndpointSpec,
        credential_env: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint,
            credential_env,
            network_id: NetworkIdSpec::default(),
            gas_limit: None,
            gas_price: None,
            skip_dry_run: false,
        }
    }

    pub fn with_network_id(mut self, network_id: NetworkIdSpec) -> Self {
        self.network_id = network_id;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_skip_dry_run(mut self, skip: bool) -> Self {
        self.skip_dry_run = skip;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &EndpointSpec {
        &self.endpoint
    }

    pub fn credential_env(&self) -> Option<&str> {
        self.credential_env.as_deref()
    }

    pub fn network_id(&self) -> &NetworkIdSpec {
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

    /// Environment variables this target reads, in resolution order.
    ///
    /// Only valid on specs that passed [`TargetTable::new`].
    pub(crate) fn required_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        match &self.endpoint {
            EndpointSpec::Local { .. } => {}
            EndpointSpec::Env(key) => keys.push(key.clone()),
            EndpointSpec::Url(template) => {
                if let Ok(segments) = parse_template(&self.name, template) {
                    keys.extend(segments.into_iter().filter_map(|s| match s {
                        Segment::Reference(key) => Some(key),
                        Segment::Literal(_) => None,
                    }));
                }
            }
        }
        keys.extend(self.credential_env.clone());
        if let NetworkIdSpec::Env(key) = &self.network_id {
            keys.push(key.clone());
        }
        keys
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::invalid_target(&self.name, reason);

        if self.name.trim().is_empty() {
            return Err(invalid("target name must not be empty"));
        }

        match &self.endpoint {
            EndpointSpec::Local { host, .. } => {
                if host.is_empty() {
                    return Err(invalid("host must not be empty"));
                }
                if self.credential_env.is_some() {
                    return Err(invalid("local targets do not take a credential"));
                }
            }
            EndpointSpec::Env(key) => {
                if key.is_empty() {
                    return Err(invalid("url_env must not be empty"));
                }
            }
            EndpointSpec::Url(template) => {
                parse_template(&self.name, template)?;
            }
        }

        if !self.endpoint_is_local() {
            match self.credential_env.as_deref() {
                None => return Err(invalid("remote targets require credential_env")),
                Some("") => return Err(invalid("credential_env must not be empty")),
                Some(_) => {}
            }
        }

        if let NetworkIdSpec::Env(key) = &self.network_id {
            if key.is_empty() {
                return Err(invalid("network_id_env must not be empty"));
            }
        }

        Ok(())
    }

    fn endpoint_is_local(&self) -> bool {
        matches!(self.endpoint, EndpointSpec::Local { .. })
    }
}

/// An ordered, validated set of target definitions with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTable {
    targets: Vec<TargetSpec>,
}

impl TargetTable {
    /// Validates `targets`. At least one target is required.
    pub fn new(targets: Vec<TargetSpec>) -> Result<Self, ConfigError> {
        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        let mut seen = HashSet::new();
        for target in &targets {
            target.validate()?;
            if !seen.insert(target.name.as_str()) {
                return Err(ConfigError::invalid_target(
                    &target.name,
                    "defined more than once",
                ));
            }
        }
        Ok(Self { targets })
    }

    /// The standard target set: a local development node plus the public
    /// networks, all remote targets except `main` sharing `TEST_WALLET_PRIVATE`.
    pub fn defaults() -> Self {
        const TEST_GAS: u64 = 5_500_000;
        let env_url = |key: &str| EndpointSpec::Env(key.to_string());
        let env_id = |key: &str| NetworkIdSpec::Env(key.to_string());
        let test = |name: &str, url: &str, id: &str| {
            TargetSpec::remote(name, env_url(url), "TEST_WALLET_PRIVATE")
                .with_network_id(env_id(id))
                .with_gas_limit(TEST_GAS)
        };

        let targets = vec![
            TargetSpec::local("dev", "127.0.0.1", 7545).with_skip_dry_run(true),
            TargetSpec::remote("main", env_url("MAIN_URL"), "MAIN_WALLET_PRIVATE")
                .with_network_id(env_id("MAIN_NETWORK_ID"))
                .with_gas_limit(2_900_000)
                .with_gas_price(35_000_000_000),
            test("rinkeby", "RIN_URL", "RIN_NETWORK_ID"),
            test("kovan", "KOVAN_URL", "KOVAN_ID").with_skip_dry_run(true),
            TargetSpec::remote(
                "evmos_dev",
                EndpointSpec::Url("https://eth.bd.evmos.dev:8545".to_string()),
                "TEST_WALLET_PRIVATE",
            )
            .with_network_id(NetworkIdSpec::Literal(NetworkId::Numeric(9000)))
            .with_gas_limit(TEST_GAS)
            .with_skip_dry_run(true),
            test("gnosis", "GNOSIS_URL", "GNOSIS_ID").with_skip_dry_run(true),
            test("polygon", "POLYGON_URL", "POLYGON_ID").with_skip_dry_run(true),
            test("scroll", "SCROLL_URL", "SCROLL_ID").with_skip_dry_run(true),
        ];

        Self { targets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetSpec> {
        self.targets.iter()
    }

    pub fn get(&self, name: &str) -> Option<&TargetSpec> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Every variable the table depends on, deduplicated, in table order.
    pub fn required_keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.targets
            .iter()
            .flat_map(TargetSpec::required_keys)
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }
}

impl Default for TargetTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// A parsed targets file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetsFile {
    pub compiler: Option<CompilerSpec>,
    pub targets: TargetTable,
}

impl TargetsFile {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawFile = toml::from_str(contents)?;
        raw.try_into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFile {
    compiler: Option<RawCompiler>,
    #[serde(default)]
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompiler {
    name: Option<String>,
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    name: String,
    host: Option<String>,
    port: Option<u16>,
    url_env: Option<String>,
    url: Option<String>,
    credential_env: Option<String>,
    network_id: Option<RawNetworkId>,
    network_id_env: Option<String>,
    gas_limit: Option<u64>,
    gas_price: Option<u64>,
    #[serde(default)]
    skip_dry_run: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNetworkId {
    Numeric(u64),
    Text(String),
}

impl TryFrom<RawFile> for TargetsFile {
    type Error = ConfigError;

    fn try_from(raw: RawFile) -> Result<Self, Self::Error> {
        let compiler = raw
            .compiler
            .map(|c| {
                CompilerSpec::with_name(
                    c.name.unwrap_or_else(|| CompilerSpec::DEFAULT_NAME.to_string()),
                    c.version,
                )
            })
            .transpose()?;

        let targets = raw
            .targets
            .into_iter()
            .map(TargetSpec::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            compiler,
            targets: TargetTable::new(targets)?,
        })
    }
}

impl TryFrom<RawTarget> for TargetSpec {
    type Error = ConfigError;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| ConfigError::invalid_target(&raw.name, reason);

        let endpoint = match (&raw.host, raw.port, &raw.url_env, &raw.url) {
            (Some(host), Some(port), None, None) => EndpointSpec::Local {
                host: host.clone(),
                port,
            },
            (None, None, Some(key), None) => EndpointSpec::Env(key.clone()),
            (None, None, None, Some(url)) => EndpointSpec::Url(url.clone()),
            (Some(_), None, None, None) | (None, Some(_), None, None) => {
                return Err(invalid("local targets need both host and port"))
            }
            (None, None, None, None) => {
                return Err(invalid("one of host/port, url_env or url is required"))
            }
            _ => return Err(invalid("host/port, url_env and url are mutually exclusive")),
        };

        let network_id = match (raw.network_id, raw.network_id_env) {
            (Some(_), Some(_)) => {
                return Err(invalid("network_id and network_id_env are mutually exclusive"))
            }
            (Some(RawNetworkId::Numeric(id)), None) => NetworkIdSpec::Literal(NetworkId::Numeric(id)),
            (Some(RawNetworkId::Text(id)), None) if id == "*" => NetworkIdSpec::Literal(NetworkId::Any),
            (Some(RawNetworkId::Text(id)), None) => NetworkIdSpec::Literal(NetworkId::Text(id)),
            (None, Some(key)) => NetworkIdSpec::Env(key),
            (None, None) => NetworkIdSpec::default(),
        };

        Ok(Self {
            name: raw.name,
            endpoint,
            credential_env: raw.credential_env,
            network_id,
            gas_limit: raw.gas_limit,
            gas_price: raw.gas_price,
            skip_dry_run: raw.skip_dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let defaults = TargetTable::defaults();
        assert_eq!(TargetTable::new(defaults.targets.clone()).unwrap(), defaults);
        assert_eq!(defaults.len(), 8);
    }

    #[test]
    fn test_default_required_keys() {
        let keys = TargetTable::defaults().required_keys();
        assert_eq!(
            keys,
            [
                "MAIN_URL",
                "MAIN_WALLET_PRIVATE",
                "MAIN_NETWORK_ID",
                "RIN_URL",
                "TEST_WALLET_PRIVATE",
                "RIN_NETWORK_ID",
                "KOVAN_URL",
                "KOVAN_ID",
                "GNOSIS_URL",
                "GNOSIS_ID",
                "POLYGON_URL",
                "POLYGON_ID",
                "SCROLL_URL",
                "SCROLL_ID",
            ]
        );
    }

    #[test]
    fn test_parse_targets_file() {
        let file = TargetsFile::from_toml_str(
            r#"
            [compiler]
            version = "0.8.20"

            [[targets]]
            name = "dev"
            host = "localhost"
            port = 8545
            network_id = "*"

            [[targets]]
            name = "sepolia"
            url = "https://sepolia.infura.io/v3/${INFURA_KEY}"
            credential_env = "TEST_WALLET_PRIVATE"
            network_id = 11155111
            gas_limit = 5500000
            skip_dry_run = true
            "#,
        )
        .unwrap();

        assert_eq!(file.compiler.unwrap().version(), "0.8.20");
        assert_eq!(file.targets.len(), 2);

        let sepolia = file.targets.get("sepolia").unwrap();
        assert_eq!(
            sepolia.network_id,
            NetworkIdSpec::Literal(NetworkId::Numeric(11155111))
        );
        assert!(sepolia.skip_dry_run);
        assert_eq!(
            file.targets.required_keys(),
            ["INFURA_KEY", "TEST_WALLET_PRIVATE"]
        );
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let result = TargetTable::new(vec![
            TargetSpec::local("dev", "127.0.0.1", 7545),
            TargetSpec::local("dev", "127.0.0.1", 8545),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidTarget { ref target, .. }) if target == "dev"
        ));
    }

    #[test]
    fn test_remote_without_credential_rejected() {
        let result = TargetsFile::from_toml_str(
            r#"
            [[targets]]
            name = "main"
            url_env = "MAIN_URL"
            "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidTarget { ref target, .. }) if target == "main"
        ));
    }

    #[test]
    fn test_local_with_credential_rejected() {
        let result = TargetsFile::from_toml_str(
            r#"
            [[targets]]
            name = "dev"
            host = "127.0.0.1"
            port = 7545
            credential_env = "TEST_WALLET_PRIVATE"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidTarget { .. })));
    }

    #[test]
    fn test_conflicting_endpoints_rejected() {
        let result = TargetsFile::from_toml_str(
            r#"
            [[targets]]
            name = "main"
            url = "https://rpc.example"
            url_env = "MAIN_URL"
            credential_env = "MAIN_WALLET_PRIVATE"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidTarget { .. })));
    }

    #[test]
    fn test_unclosed_url_reference_rejected_at_load() {
        let result = TargetsFile::from_toml_str(
            r#"
            [[targets]]
            name = "polygon"
            url = "https://polygon.example/${POLYGON_KEY"
            credential_env = "TEST_WALLET_PRIVATE"
            "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnclosedReference { ref target }) if target == "polygon"
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = TargetsFile::from_toml_str(
            r#"
            [[targets]]
            name = "dev"
            host = "127.0.0.1"
            port = 7545
            gas = 100
            "#,
        );
        assert!(matches!(result, Err(ConfigError::DeserializeError(_))));
    }

    #[test]
    fn test_file_without_targets_rejected() {
        let result = TargetsFile::from_toml_str(
            r#"
            [compiler]
            version = "0.8.14"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::NoTargets)));
        assert!(matches!(TargetTable::new(Vec::new()), Err(ConfigError::NoTargets)));
    }

    #[test]
    fn test_target_spec_accessors() {
        let defaults = TargetTable::defaults();

        let main = defaults.get("main").unwrap();
        assert_eq!(
            main.network_id(),
            &NetworkIdSpec::Env("MAIN_NETWORK_ID".to_string())
        );
        assert_eq!(main.gas_limit(), Some(2_900_000));
        assert_eq!(main.gas_price(), Some(35_000_000_000));
        assert!(!main.skip_dry_run());

        let evmos = defaults.get("evmos_dev").unwrap();
        assert_eq!(
            evmos.network_id(),
            &NetworkIdSpec::Literal(NetworkId::Numeric(9000))
        );
        assert_eq!(evmos.gas_price(), None);
        assert!(evmos.skip_dry_run());
    }

    #[test]
    fn test_invalid_compiler_version_rejected() {
        let result = TargetsFile::from_toml_str(
            r#"
            [compiler]
            version = "latest"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidCompilerVersion(_))));
    }
}
