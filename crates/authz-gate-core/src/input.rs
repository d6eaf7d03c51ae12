// crates/authz-gate-core/src/input.rs
// ============================================================================
// Module: Decision Input
// Description: Typed description of an inbound HTTP request for policy checks.
// Purpose: Normalize a request and its captured body into a decision input.
// Dependencies: http, percent-encoding, serde, serde_jcs, url
// ============================================================================

//! ## Overview
//! [`DecisionInput`] is the document submitted to the decision service. It is
//! built from a request plus the body bytes the caller already captured, so
//! construction never touches the request body itself.
//! Invariants:
//! - `headers` carries only the `Authorization` value (empty when absent).
//! - `form_params` is empty unless the method is `POST`.
//! - `query_params` preserves every value of a repeated key, in order.
//! - Canonical serialization is deterministic for identical inputs.
//!
//! Security posture: every field is caller-controlled and untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use http::HeaderMap;
use http::Method;
use http::Request;
use http::Version;
use http::header::AUTHORIZATION;
use http::header::CONTENT_TYPE;
use http::header::HOST;
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde::Serialize;
use url::form_urlencoded;

use crate::error::DecisionError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Media type whose bodies are parsed into form parameters.
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

// ============================================================================
// SECTION: Input Document
// ============================================================================

/// Decision input document submitted to the decision service.
///
/// # Invariants
/// - The document has exactly one top-level namespace, `http`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionInput {
    /// Request description.
    pub http: HttpInput,
}

/// HTTP request description inside a [`DecisionInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpInput {
    /// Request method, for example `GET`.
    pub method: String,
    /// Request URI scheme; empty for origin-form request targets.
    pub scheme: String,
    /// Host as presented by the transport, including any port.
    pub host: String,
    /// Percent-decoded request path without the query string.
    pub path: String,
    /// Minimized header set.
    pub headers: InputHeaders,
    /// Raw request body as text.
    pub body: String,
    /// Query parameters with every value of repeated keys.
    pub query_params: BTreeMap<String, Vec<String>>,
    /// Form parameters (first value wins); empty unless the method is `POST`.
    pub form_params: BTreeMap<String, String>,
    /// Protocol version label, for example `HTTP/1.1`.
    pub protocol: String,
}

/// Headers forwarded to the decision service.
///
/// # Invariants
/// - No header other than `Authorization` is representable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputHeaders {
    /// `Authorization` header value, empty when absent.
    #[serde(rename = "Authorization")]
    pub authorization: String,
}

impl DecisionInput {
    /// Builds a decision input from a request and its captured body bytes.
    ///
    /// The request body is not read; callers pass the bytes they buffered and
    /// keep ownership of the request for forwarding.
    #[must_use]
    pub fn from_request<B>(request: &Request<B>, body: &[u8]) -> Self {
        let method = request.method();
        let uri = request.uri();
        let form_params = if method == Method::POST && is_form_body(request.headers(), body) {
            parse_form_params(body)
        } else {
            BTreeMap::new()
        };
        Self {
            http: HttpInput {
                method: method.as_str().to_string(),
                scheme: uri.scheme_str().unwrap_or_default().to_string(),
                host: request_host(request),
                path: decode_path(uri.path()),
                headers: InputHeaders {
                    authorization: first_header_text(request.headers(), &AUTHORIZATION),
                },
                body: String::from_utf8_lossy(body).into_owned(),
                query_params: parse_query_params(uri.query()),
                form_params,
                protocol: protocol_label(request.version()).to_string(),
            },
        }
    }

    /// Encodes the input as canonical JSON (RFC 8785 key ordering).
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Serialize`] when encoding fails.
    pub fn to_canonical_json(&self) -> Result<String, DecisionError> {
        serde_jcs::to_string(self).map_err(|err| DecisionError::Serialize(err.to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a query string into a one-to-many parameter map.
#[must_use]
pub fn parse_query_params(query: Option<&str>) -> BTreeMap<String, Vec<String>> {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let Some(query) = query else {
        return params;
    };
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params.entry(key.into_owned()).or_default().push(value.into_owned());
    }
    params
}

/// Parses a URL-encoded form body, keeping the first value of each key.
#[must_use]
pub fn parse_form_params(body: &[u8]) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(body) {
        params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    params
}

/// Returns true when a `POST` body should be parsed as form data.
///
/// A declared `Content-Type` must be form-encoded. Without one, the body is
/// parsed only when it is made of `key=value` pairs.
fn is_form_body(headers: &HeaderMap, body: &[u8]) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return looks_form_encoded(body);
    };
    let Ok(content_type) = value.to_str() else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case(FORM_URLENCODED)
}

/// Returns true when every `&`-separated segment is a `key=value` pair of
/// URL-safe bytes.
fn looks_form_encoded(body: &[u8]) -> bool {
    let url_safe = body.iter().all(|byte| {
        byte.is_ascii_alphanumeric() || b"-._~%+=&!$'()*,;:@/?".contains(byte)
    });
    url_safe
        && body
            .split(|byte| *byte == b'&')
            .filter(|segment| !segment.is_empty())
            .all(|segment| segment.iter().position(|byte| *byte == b'=').is_some_and(|at| at > 0))
}

/// Resolves the request host from the URI authority or the `Host` header.
fn request_host<B>(request: &Request<B>) -> String {
    if let Some(authority) = request.uri().authority() {
        let raw = authority.as_str();
        return raw.rsplit('@').next().unwrap_or(raw).to_string();
    }
    first_header_text(request.headers(), &HOST)
}

/// Returns the first value of a header as text, or an empty string.
fn first_header_text(headers: &HeaderMap, name: &http::HeaderName) -> String {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// Percent-decodes a request path.
fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Returns the protocol label for an HTTP version.
fn protocol_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "unknown",
    }
}
