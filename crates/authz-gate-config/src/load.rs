// crates/authz-gate-config/src/load.rs
// ============================================================================
// Module: Config Loading
// Description: Config file discovery and guarded reads.
// Purpose: Load TOML config with path, size, and encoding limits.
// Dependencies: std, crate::config
// ============================================================================

//! ## Overview
//! The config path is taken from the explicit argument, then the
//! [`CONFIG_ENV_VAR`] environment variable, then [`DEFAULT_CONFIG_NAME`] in
//! the working directory if it exists. With none of those, defaults apply.
//! Invariants:
//! - Explicit or env-provided paths must exist.
//! - Files larger than [`MAX_CONFIG_FILE_BYTES`] or not UTF-8 are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::config::GateConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "AUTHZ_GATE_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "authz-gate.toml";
/// Maximum config file size, in bytes.
pub const MAX_CONFIG_FILE_BYTES: usize = 1024 * 1024;
/// Maximum total config path length.
const MAX_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Loading
// ============================================================================

impl GateConfig {
    /// Loads, parses, and validates the gate configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR);
        match resolve_config_path(path, env_path) {
            Some(path) => Self::load_file(&path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Loads a specific config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let source = read_limited_utf8(path)?;
        Self::from_toml_str(&source)
    }
}

/// Resolves which config file to load, if any.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>, env_path: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_NAME);
    fallback.is_file().then_some(fallback)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Enforces path length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(ConfigError::Invalid("config path component too long".to_string()));
    }
    Ok(())
}

/// Reads a file as UTF-8 while enforcing the size limit.
fn read_limited_utf8(path: &Path) -> Result<String, ConfigError> {
    let file = File::open(path)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    let limit = u64::try_from(MAX_CONFIG_FILE_BYTES)
        .map_err(|_| ConfigError::Invalid("config size limit exceeds u64".to_string()))?;
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
    if bytes.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))
}
