// crates/authz-gate-core/src/error.rs
// ============================================================================
// Module: Authz Gate Errors
// Description: Error taxonomy for input construction and decision retrieval.
// Purpose: Keep body-read, serialization, and transport failures distinct.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Errors here carry operator-facing detail. They are logged by the gate and
//! never reflected into client-facing responses.

use thiserror::Error;

// ============================================================================
// SECTION: Input Errors
// ============================================================================

/// Errors raised while capturing an inbound request.
///
/// # Invariants
/// - A body-read failure is never downgraded to an empty body.
#[derive(Debug, Error)]
pub enum InputError {
    /// The request body could not be read from the transport.
    #[error("request body read failed: {0}")]
    BodyRead(String),
    /// The request body exceeded the configured capture limit.
    #[error("request body exceeds {max_bytes} byte limit")]
    BodyTooLarge {
        /// Configured limit in bytes.
        max_bytes: usize,
    },
}

// ============================================================================
// SECTION: Decision Errors
// ============================================================================

/// Errors raised while retrieving a verdict from the decision service.
///
/// # Invariants
/// - A policy deny is a [`crate::Verdict`], not a [`DecisionError`].
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The decision input could not be encoded.
    #[error("decision input serialization failed: {0}")]
    Serialize(String),
    /// The configured decision endpoint is not a usable URL.
    #[error("invalid decision endpoint: {0}")]
    InvalidEndpoint(String),
    /// The decision service could not be reached or the exchange failed.
    #[error("decision service transport failed: {0}")]
    Transport(String),
    /// The decision service answered with a non-success status.
    #[error("decision service returned http status {0}")]
    Status(u16),
    /// The decision response exceeded the configured size limit.
    #[error("decision response exceeds {max_bytes} byte limit")]
    ResponseTooLarge {
        /// Configured limit in bytes.
        max_bytes: usize,
    },
    /// The decision response body was not a valid verdict document.
    #[error("decision response decode failed: {0}")]
    Decode(String),
}
