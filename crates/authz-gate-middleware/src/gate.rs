// crates/authz-gate-middleware/src/gate.rs
// ============================================================================
// Module: Authorization Gate
// Description: Per-request allow/deny enforcement around downstream handlers.
// Purpose: Forward only requests the decision service explicitly allows.
// Dependencies: authz-gate-core, axum, tracing
// ============================================================================

//! ## Overview
//! [`AuthzGate::check`] performs the capture, input, and decision steps and
//! reports a [`GateOutcome`]. [`authorize_request`] wraps it as axum
//! middleware and turns the outcome into a response.
//!
//! # Invariants
//! - The downstream handler runs only for [`authz_gate_core::Verdict::Allow`].
//! - When it runs it receives the original request with its full body.
//! - Allowed responses pass through untouched.
//! - Request bodies and `Authorization` values are never logged.

use std::sync::Arc;
use std::time::Instant;

use authz_gate_core::DecisionClient;
use authz_gate_core::DecisionInput;
use authz_gate_core::Verdict;
use axum::Router;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::middleware::from_fn_with_state;
use axum::response::Response;
use tracing::debug;
use tracing::error;
use tracing::info;

use crate::body::capture_body;
use crate::error::GateError;
use crate::response::forbidden_response;
use crate::response::internal_error_response;


// ============================================================================
// SECTION: Gate
// ============================================================================

/// What the gate decided for one request.
#[derive(Debug)]
pub enum GateOutcome {
    /// Policy allowed the request; carries the restored request.
    Forward(Request),
    /// Policy denied the request.
    Deny,
}

/// Shared gate state: the decision capability and the body capture limit.
///
/// Cloning is cheap and clones share the same client.
#[derive(Clone)]
pub struct AuthzGate {
    /// Decision capability shared across requests.
    client: Arc<dyn DecisionClient>,
    /// Maximum request body captured for evaluation.
    max_body_bytes: usize,
}

impl AuthzGate {
    /// Creates a gate over the provided decision client.
    #[must_use]
    pub fn new(client: Arc<dyn DecisionClient>, max_body_bytes: usize) -> Self {
        Self { client, max_body_bytes }
    }

    /// Evaluates a request against policy.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when the body cannot be captured or no verdict
    /// can be obtained. Callers must treat every error as a rejection.
    pub async fn check(&self, request: Request) -> Result<GateOutcome, GateError> {
        let (request, body) = capture_body(request, self.max_body_bytes).await?;
        let input = DecisionInput::from_request(&request, &body);
        match self.client.decide(&input).await? {
            Verdict::Allow => Ok(GateOutcome::Forward(request)),
            Verdict::Deny => Ok(GateOutcome::Deny),
        }
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Axum middleware enforcing the gate in front of `next`.
pub async fn authorize_request(
    State(gate): State<AuthzGate>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    match gate.check(request).await {
        Ok(GateOutcome::Forward(request)) => {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            debug!(%method, %path, elapsed_ms, "request allowed");
            next.run(request).await
        }
        Ok(GateOutcome::Deny) => {
            info!(%method, %path, "request denied by policy");
            forbidden_response()
        }
        Err(err) => {
            let status = err.status_code().as_u16();
            error!(%method, %path, kind = err.kind(), status, error = %err, "authorization failed");
            internal_error_response()
        }
    }
}

/// Wraps every route of `router` with the gate.
#[must_use]
pub fn protect<S>(router: Router<S>, gate: AuthzGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(gate, authorize_request))
}
