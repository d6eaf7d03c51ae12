// crates/authz-gate-core/src/lib.rs
// ============================================================================
// Module: Authz Gate Core Library
// Description: Decision input model, verdict model, and decision interfaces.
// Purpose: Define the request-to-decision contract shared by every gate crate.
// Dependencies: http, serde, serde_jcs, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! Authz Gate Core describes an inbound HTTP request as a typed
//! [`DecisionInput`], defines the [`Verdict`] returned by a policy decision
//! service, and exposes the [`DecisionClient`] seam that transports one to
//! the other.
//! Invariants:
//! - Only the `Authorization` header is ever copied into a decision input.
//! - Form parameters are populated only for `POST` requests.
//! - A structurally absent `allow` field is a deny, never an allow.
//!
//! Security posture: request data is untrusted; every ambiguous decision
//! outcome must fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod input;
pub mod interfaces;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::DecisionError;
pub use error::InputError;
pub use input::DecisionInput;
pub use input::HttpInput;
pub use input::InputHeaders;
pub use interfaces::DecisionClient;
pub use verdict::DEFAULT_DECISION_TIMEOUT_MS;
pub use verdict::DEFAULT_DECISION_URL;
pub use verdict::DEFAULT_MAX_RESPONSE_BYTES;
pub use verdict::DEFAULT_USER_AGENT;
pub use verdict::Verdict;
pub use verdict::parse_verdict;
