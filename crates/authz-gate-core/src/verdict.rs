// crates/authz-gate-core/src/verdict.rs
// ============================================================================
// Module: Decision Verdict
// Description: Verdict model and strict decoding of decision responses.
// Purpose: Turn a decision service response body into allow or deny.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Decision services answer with `{"result": {"allow": <bool>}}`. Only the
//! nested boolean is meaningful.
//! Invariants:
//! - Malformed JSON, or an `allow` that is not a boolean, is a decode error.
//! - An absent or `null` `result` or `allow` decodes to [`Verdict::Deny`],
//!   as does a bare `null` body.
//! - Unknown sibling fields are ignored.

use serde::Deserialize;

use crate::error::DecisionError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default decision endpoint used when none is configured.
pub const DEFAULT_DECISION_URL: &str = "http://localhost:8181/v1/data/httpapi/authz";
/// Default timeout bounding one decision call, in milliseconds.
pub const DEFAULT_DECISION_TIMEOUT_MS: u64 = 5_000;
/// Default upper bound on a decision response body, in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Default user agent sent to the decision service.
pub const DEFAULT_USER_AGENT: &str = "authz-gate/0.1";

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Authorization verdict returned by a decision service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The request may proceed.
    Allow,
    /// The request must be rejected.
    Deny,
}

impl Verdict {
    /// Maps a decision boolean to a verdict.
    #[must_use]
    pub const fn from_allow(allow: bool) -> Self {
        if allow { Self::Allow } else { Self::Deny }
    }

    /// Returns true for [`Verdict::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns a stable label for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

// ============================================================================
// SECTION: Response Decoding
// ============================================================================

/// Decision response envelope.
#[derive(Debug, Deserialize)]
struct DecisionResponse {
    /// Policy result; absent or null when the policy is undefined.
    #[serde(default)]
    result: Option<DecisionResult>,
}

/// Policy result body.
#[derive(Debug, Deserialize)]
struct DecisionResult {
    /// Allow flag; absent or null means deny.
    #[serde(default)]
    allow: Option<bool>,
}

/// Decodes a decision response body into a verdict.
///
/// # Errors
///
/// Returns [`DecisionError::Decode`] when the body is not a JSON object of
/// the expected shape.
pub fn parse_verdict(body: &[u8]) -> Result<Verdict, DecisionError> {
    let response: Option<DecisionResponse> =
        serde_json::from_slice(body).map_err(|err| DecisionError::Decode(err.to_string()))?;
    let allow = response.and_then(|response| response.result).and_then(|result| result.allow);
    Ok(Verdict::from_allow(allow.unwrap_or(false)))
}
