// crates/authz-gate-middleware/src/error.rs
// ============================================================================
// Module: Gate Errors
// Description: Failures that stop the gate from reaching a verdict.
// Purpose: Collapse capture and decision failures into one fail-closed error.
// Dependencies: authz-gate-core, axum, thiserror
// ============================================================================

//! ## Overview
//! [`GateError`] wraps body capture and decision failures. Every variant is
//! answered with the same fixed `500` response; [`GateError::kind`] gives
//! logs a stable label.

use authz_gate_core::DecisionError;
use authz_gate_core::InputError;
use axum::http::StatusCode;
use thiserror::Error;

/// Reasons a request could not be evaluated.
///
/// # Invariants
/// - Every variant maps to `500 Internal Server Error`.
/// - Display output is for logs only and never reaches the client.
#[derive(Debug, Error)]
pub enum GateError {
    /// The inbound request could not be captured.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The decision service did not yield a verdict.
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

impl GateError {
    /// Returns the status code sent to the client.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Input(_) | Self::Decision(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a stable label for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Input(InputError::BodyRead(_)) => "body_read",
            Self::Input(InputError::BodyTooLarge { .. }) => "body_too_large",
            Self::Decision(DecisionError::Serialize(_)) => "serialize",
            Self::Decision(DecisionError::InvalidEndpoint(_)) => "invalid_endpoint",
            Self::Decision(DecisionError::Transport(_)) => "transport",
            Self::Decision(DecisionError::Status(_)) => "status",
            Self::Decision(DecisionError::ResponseTooLarge { .. }) => "response_too_large",
            Self::Decision(DecisionError::Decode(_)) => "decode",
        }
    }
}
