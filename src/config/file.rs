//! Targets file loading.

use std::path::Path;

use super::targets::TargetsFile;
use super::ConfigError;

/// Loads and parses a TOML targets file.
///
/// A missing file is an error: a targets file is only consulted when it was
/// named explicitly.
pub fn load_targets_file(path: impl AsRef<Path>) -> Result<TargetsFile, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    TargetsFile::from_toml_str(&contents).map_err(|e| match e {
        ConfigError::DeserializeError(source) => ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
