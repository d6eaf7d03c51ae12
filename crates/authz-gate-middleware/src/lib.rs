// crates/authz-gate-middleware/src/lib.rs
// ============================================================================
// Module: Authz Gate Middleware Library
// Description: Axum middleware enforcing external policy decisions.
// Purpose: Capture each request, ask the decision service, and forward or reject.
// Dependencies: authz-gate-core, axum, bytes, http-body-util, tracing
// ============================================================================

//! ## Overview
//! [`AuthzGate`] sits in front of any axum [`axum::Router`]. For every
//! request it buffers the body, builds a
//! [`authz_gate_core::DecisionInput`], and asks its
//! [`authz_gate_core::DecisionClient`] for a verdict.
//!
//! | Outcome            | Response                                    |
//! |--------------------|---------------------------------------------|
//! | allow              | downstream handler runs with the full body  |
//! | deny               | `403 Forbidden`, downstream never runs      |
//! | any gate error     | `500 Internal Server Error`, downstream never runs |
//!
//! Security posture: the gate fails closed, and rejection bodies are fixed
//! strings that never echo request data or error detail.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod body;
pub mod error;
pub mod gate;
pub mod response;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use body::capture_body;
pub use error::GateError;
pub use gate::AuthzGate;
pub use gate::GateOutcome;
pub use gate::authorize_request;
pub use gate::protect;
pub use response::forbidden_response;
pub use response::internal_error_response;
