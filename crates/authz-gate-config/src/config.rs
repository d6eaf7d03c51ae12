// crates/authz-gate-config/src/config.rs
// ============================================================================
// Module: Gate Configuration Model
// Description: Typed configuration sections with defaults and validation.
// Purpose: Reject unusable endpoints and limits before the gate starts.
// Dependencies: authz-gate-core, serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration is split into `[decision]`, `[request]`, and `[server]`
//! sections. Unknown keys are rejected so typos fail loudly instead of
//! silently falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;

use authz_gate_core::DEFAULT_DECISION_TIMEOUT_MS;
use authz_gate_core::DEFAULT_DECISION_URL;
use authz_gate_core::DEFAULT_MAX_RESPONSE_BYTES;
use authz_gate_core::DEFAULT_USER_AGENT;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted decision timeout, in milliseconds.
pub const MAX_DECISION_TIMEOUT_MS: u64 = 120_000;
/// Maximum accepted value for any byte limit.
pub const MAX_BYTE_LIMIT: usize = 64 * 1024 * 1024;
/// Default byte limit for captured request bodies.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
/// Default listener address for the standalone gate.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default upstream connect timeout, in milliseconds.
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Maximum accepted upstream connect timeout, in milliseconds.
pub const MAX_UPSTREAM_CONNECT_TIMEOUT_MS: u64 = 120_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config file is not valid TOML for this model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The config parsed but failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root gate configuration.
///
/// # Invariants
/// - Immutable after load; shared read-only across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Decision service settings.
    pub decision: DecisionConfig,
    /// Inbound request capture settings.
    pub request: RequestConfig,
    /// Standalone server settings.
    pub server: ServerConfig,
}

/// Decision service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecisionConfig {
    /// Decision endpoint URL.
    pub url: String,
    /// Timeout bounding each decision call, in milliseconds.
    pub timeout_ms: u64,
    /// Maximum verdict body size, in bytes.
    pub max_response_bytes: usize,
    /// User agent sent to the decision service.
    pub user_agent: String,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DECISION_URL.to_string(),
            timeout_ms: DEFAULT_DECISION_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Inbound request capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestConfig {
    /// Maximum request body captured for decision input, in bytes.
    pub max_body_bytes: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Standalone server settings used by the `authz-gate` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listener address.
    pub bind: String,
    /// Protected backend URL; required to serve.
    pub upstream: Option<String>,
    /// Timeout for establishing upstream connections, in milliseconds.
    pub upstream_connect_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            upstream: None,
            upstream_connect_timeout_ms: DEFAULT_UPSTREAM_CONNECT_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// SECTION: Parsing and Validation
// ============================================================================

impl GateConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decision.validate()?;
        self.request.validate()?;
        self.server.validate()
    }
}

impl DecisionConfig {
    /// Validates decision settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = parse_http_url("decision.url", &self.url)?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::Invalid("decision.url must not embed credentials".to_string()));
        }
        if url.fragment().is_some() {
            return Err(ConfigError::Invalid("decision.url must not carry a fragment".to_string()));
        }
        if self.timeout_ms == 0 || self.timeout_ms > MAX_DECISION_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "decision.timeout_ms must be between 1 and {MAX_DECISION_TIMEOUT_MS}"
            )));
        }
        validate_byte_limit("decision.max_response_bytes", self.max_response_bytes)?;
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("decision.user_agent must be non-empty".to_string()));
        }
        Ok(())
    }
}

impl RequestConfig {
    /// Validates request capture settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_byte_limit("request.max_body_bytes", self.max_body_bytes)
    }
}

impl ServerConfig {
    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if let Some(upstream) = &self.upstream {
            parse_http_url("server.upstream", upstream)?;
        }
        let timeout = self.upstream_connect_timeout_ms;
        if timeout == 0 || timeout > MAX_UPSTREAM_CONNECT_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "server.upstream_connect_timeout_ms must be between 1 and \
                 {MAX_UPSTREAM_CONNECT_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    /// Parses the listener address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| {
            ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind))
        })
    }
}

/// Parses an absolute `http`/`https` URL.
fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw).map_err(|err| ConfigError::Invalid(format!("{field} is invalid: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Invalid(format!("{field} has unsupported scheme: {scheme}"))),
    }
}

/// Enforces byte limit bounds.
fn validate_byte_limit(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_BYTE_LIMIT {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between 1 and {MAX_BYTE_LIMIT}"
        )));
    }
    Ok(())
}
