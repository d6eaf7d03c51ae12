// crates/authz-gate-middleware/src/body.rs
// ============================================================================
// Module: Body Capture
// Description: Buffer a request body and rebuild the request around it.
// Purpose: Let the gate read the body without consuming it for downstream.
// Dependencies: authz-gate-core, axum, bytes, http-body-util
// ============================================================================

//! ## Overview
//! Request bodies are single-use streams. [`capture_body`] drains the stream
//! under a byte limit, then returns a rebuilt request whose body yields the
//! same bytes, together with a cheap handle to those bytes for inspection.
//!
//! # Invariants
//! - On success the rebuilt request carries the original head unchanged.
//! - The rebuilt request is produced before any later fallible step runs, so
//!   no caller path can observe a drained body.
//! - A read failure is an error, never an empty body.

use authz_gate_core::InputError;
use axum::body::Body;
use axum::extract::Request;
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::LengthLimitError;
use http_body_util::Limited;


/// Reads the full request body and restores it onto the request.
///
/// # Errors
///
/// Returns [`InputError::BodyTooLarge`] when the body exceeds `max_bytes`
/// and [`InputError::BodyRead`] when the transport fails mid-read.
pub async fn capture_body(
    request: Request,
    max_bytes: usize,
) -> Result<(Request, Bytes), InputError> {
    let (parts, body) = request.into_parts();
    let bytes = match Limited::new(body, max_bytes).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(InputError::BodyTooLarge { max_bytes });
        }
        Err(err) => return Err(InputError::BodyRead(err.to_string())),
    };
    let restored = Request::from_parts(parts, Body::from(bytes.clone()));
    Ok((restored, bytes))
}
