// crates/authz-gate-middleware/src/response.rs
// ============================================================================
// Module: Rejection Responses
// Description: Fixed responses for denied and failed requests.
// Purpose: Keep rejection bodies constant so nothing internal leaks.
// Dependencies: axum
// ============================================================================

//! ## Overview
//! Constant rejection responses. Bodies are `text/plain` with `nosniff` and
//! never carry error detail.

use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;

/// Body sent with `403 Forbidden`.
pub const FORBIDDEN_BODY: &str = "Forbidden";
/// Body sent with `500 Internal Server Error`.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Response for a policy deny.
#[must_use]
pub fn forbidden_response() -> Response {
    plain_text(StatusCode::FORBIDDEN, FORBIDDEN_BODY)
}

/// Response for any failure to reach a verdict.
#[must_use]
pub fn internal_error_response() -> Response {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}

/// Builds a plain-text response that browsers will not sniff.
fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        body,
    )
        .into_response()
}
