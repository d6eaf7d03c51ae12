// crates/authz-gate-cli/src/check.rs
// ============================================================================
// Module: One-Shot Check
// Description: Build a decision input from flags and query the decision service.
// Purpose: Let operators see exactly what policy receives and what it answers.
// Dependencies: authz-gate-core, axum (http types), serde, thiserror
// ============================================================================

//! ## Overview
//! [`CheckRequest`] describes a synthetic inbound request. It goes through
//! the same input constructor the gate uses, so the printed input matches
//! what a live request with the same shape would send.

use authz_gate_core::DecisionClient;
use authz_gate_core::DecisionError;
use authz_gate_core::DecisionInput;
use authz_gate_core::Verdict;
use axum::http::Method;
use axum::http::Request;
use axum::http::header;
use serde::Serialize;
use thiserror::Error;

/// Check failures.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Flags do not describe a valid HTTP request.
    #[error("invalid check request: {0}")]
    InvalidRequest(String),
    /// The decision service did not yield a verdict.
    #[error(transparent)]
    Decision(#[from] DecisionError),
}

/// Synthetic request evaluated by `authz-gate check`.
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    /// HTTP method token.
    pub method: String,
    /// Request target: path with optional query.
    pub target: String,
    /// Optional `Host` header.
    pub host: Option<String>,
    /// Optional `Authorization` header.
    pub authorization: Option<String>,
    /// Optional `Content-Type` header.
    pub content_type: Option<String>,
    /// Request body.
    pub body: String,
}

impl CheckRequest {
    /// Builds the decision input for this request.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidRequest`] when the method, target, or a
    /// header value is malformed.
    pub fn to_input(&self) -> Result<DecisionInput, CheckError> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|err| CheckError::InvalidRequest(format!("method: {err}")))?;
        let mut builder = Request::builder().method(method).uri(self.target.as_str());
        if let Some(host) = &self.host {
            builder = builder.header(header::HOST, host.as_str());
        }
        if let Some(authorization) = &self.authorization {
            builder = builder.header(header::AUTHORIZATION, authorization.as_str());
        }
        if let Some(content_type) = &self.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type.as_str());
        }
        let request = builder.body(()).map_err(|err| CheckError::InvalidRequest(err.to_string()))?;
        Ok(DecisionInput::from_request(&request, self.body.as_bytes()))
    }
}

/// Printed result of a check.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Input submitted to the decision service.
    pub input: DecisionInput,
    /// Verdict label: `allow` or `deny`.
    pub verdict: &'static str,
}

/// Runs one check against `client`.
///
/// # Errors
///
/// Returns [`CheckError`] when the request is malformed or no verdict is
/// obtained.
pub async fn run_check(
    client: &dyn DecisionClient,
    request: &CheckRequest,
) -> Result<(CheckReport, Verdict), CheckError> {
    let input = request.to_input()?;
    let verdict = client.decide(&input).await?;
    Ok((CheckReport { input, verdict: verdict.as_str() }, verdict))
}
