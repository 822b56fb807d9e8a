//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load and deserialize a TOML file.
///
/// Unlike optional configuration fragments, the company file is mandatory:
/// a missing file is reported as [`ConfigError::NotFound`].
///
/// # Errors
///
/// Returns an error if the file is missing, cannot be read, or does not
/// deserialize into `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_config(&content, path)
}

/// Deserialize TOML `content`, attributing errors to `origin`.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if `content` does not deserialize into `T`.
pub fn parse_config<T: DeserializeOwned>(content: &str, origin: &Path) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.display().to_string(),
        source,
    })
}
