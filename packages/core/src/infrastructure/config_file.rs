//! Loading the chat session config from disk.

use std::{fs, path::Path};

use crate::domain::SessionConfig;

use super::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "twitch.cfg";

/// Read and parse a `key=value` session config file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] when the file cannot be read. Parse problems are
/// never errors; unknown or malformed lines are skipped.
pub fn load_session_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(SessionConfig::parse(&contents))
}
