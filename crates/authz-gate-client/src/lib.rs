// crates/authz-gate-client/src/lib.rs
// ============================================================================
// Module: Authz Gate Client Library
// Description: HTTP implementation of the decision client interface.
// Purpose: Query a remote policy decision service for request verdicts.
// Dependencies: authz-gate-core, reqwest, url
// ============================================================================

//! ## Overview
//! This crate provides [`HttpDecisionClient`], the production
//! [`authz_gate_core::DecisionClient`]. It encodes the decision input as a
//! single `input` query parameter on a GET request and strictly decodes the
//! verdict document.
//!
//! Security posture: decision responses are untrusted and bounded; every
//! failure is surfaced as an error so the gate can fail closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::HttpDecisionClient;
pub use client::HttpDecisionClientConfig;
pub use client::INPUT_QUERY_PARAM;
