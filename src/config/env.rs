use std::collections::HashMap;
use std::fmt;

use super::source::EnvSource;

/// A snapshot of the process environment.
///
/// Variables are copied once when the snapshot is taken; later changes to the
/// process environment are not observed. Variables whose name or value is not
/// valid UTF-8 are treated as absent.
#[derive(Clone, Default)]
pub struct ProcessEnv {
    vars: HashMap<String, String>,
}

impl ProcessEnv {
    pub fn snapshot() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { vars }
    }
}

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl fmt::Debug for ProcessEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessEnv")
            .field("vars", &self.vars.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reads_process_env() {
        temp_env::with_vars(
            [
                ("DEPLOY_PROFILES_TEST_URL", Some("https://rpc.example")),
                ("DEPLOY_PROFILES_TEST_EMPTY", Some("")),
                ("DEPLOY_PROFILES_TEST_UNSET", None),
            ],
            || {
                let env = ProcessEnv::snapshot();
                assert_eq!(
                    env.get("DEPLOY_PROFILES_TEST_URL").as_deref(),
                    Some("https://rpc.example")
                );
                assert_eq!(env.get("DEPLOY_PROFILES_TEST_EMPTY").as_deref(), Some(""));
                assert_eq!(env.get("DEPLOY_PROFILES_TEST_UNSET"), None);
            },
        );
    }

    #[test]
    fn test_snapshot_is_not_live() {
        let env = temp_env::with_var("DEPLOY_PROFILES_TEST_LATE", None::<&str>, ProcessEnv::snapshot);

        temp_env::with_var("DEPLOY_PROFILES_TEST_LATE", Some("set-later"), || {
            assert_eq!(env.get("DEPLOY_PROFILES_TEST_LATE"), None);
        });
    }
}
