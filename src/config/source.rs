use std::collections::BTreeMap;
use std::fmt;

/// A read-only key/value view of environment state.
///
/// The resolver never touches `std::env` directly; every lookup goes through
/// the source it was built with.
pub trait EnvSource: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
}

/// An in-memory environment, mostly useful in tests.
///
/// ```
/// use deploy_profiles::config::{EnvSource, MapEnv};
///
/// let env: MapEnv = [("MAIN_URL", "https://rpc.example")].into_iter().collect();
/// assert_eq!(env.get("MAIN_URL").as_deref(), Some("https://rpc.example"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

// Values may be secrets, so only the keys are printed.
impl fmt::Debug for MapEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.vars.keys()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
