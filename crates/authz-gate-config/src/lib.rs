// crates/authz-gate-config/src/lib.rs
// ============================================================================
// Module: Authz Gate Config Library
// Description: Configuration model, defaults, validation, and loading.
// Purpose: Provide one immutable configuration shared by every request.
// Dependencies: authz-gate-core, serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! [`GateConfig`] carries the decision endpoint and the limits the gate
//! enforces. Every field has a documented default, so an empty file (or no
//! file) yields a working configuration pointing at
//! [`authz_gate_core::DEFAULT_DECISION_URL`].
//!
//! Security posture: config files are operator input but are still loaded
//! with size, path, and encoding guards and validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod load;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DecisionConfig;
pub use config::GateConfig;
pub use config::RequestConfig;
pub use config::ServerConfig;
pub use load::CONFIG_ENV_VAR;
pub use load::DEFAULT_CONFIG_NAME;
pub use load::MAX_CONFIG_FILE_BYTES;
pub use load::resolve_config_path;
