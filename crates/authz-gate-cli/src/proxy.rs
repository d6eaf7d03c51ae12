// crates/authz-gate-cli/src/proxy.rs
// ============================================================================
// Module: Upstream Proxy
// Description: Reverse proxy to a single upstream for allowed requests.
// Purpose: Give `authz-gate serve` a downstream to protect.
// Dependencies: axum, reqwest, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! [`UpstreamProxy`] forwards method, path, query, end-to-end headers, and
//! body to the upstream, then relays status, headers, and body back.
//!
//! # Invariants
//! - Hop-by-hop headers (RFC 9110 section 7.6.1) and any header named in
//!   `Connection` are not forwarded in either direction.
//! - Upstream redirects are relayed to the client, never followed.
//! - Any upstream failure becomes `502 Bad Gateway` with a fixed body.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::Response;
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::error;
use url::Url;


// ============================================================================
// SECTION: Constants
// ============================================================================

/// Headers that only apply to a single transport hop.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Body sent with `502 Bad Gateway`.
pub const BAD_GATEWAY_BODY: &str = "Bad Gateway";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Upstream proxy failures.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Upstream URL is unusable.
    #[error("invalid upstream: {0}")]
    InvalidUpstream(String),
    /// Exchange with the upstream failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),
    /// Inbound body could not be buffered for forwarding.
    #[error("request body forwarding failed: {0}")]
    Body(String),
}

// ============================================================================
// SECTION: Proxy
// ============================================================================

/// Forwards requests to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    /// Upstream base; its path is a prefix for every forwarded path.
    base: Url,
    /// HTTP client with redirects disabled.
    client: reqwest::Client,
}

impl UpstreamProxy {
    /// Creates a proxy for `upstream`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidUpstream`] when the URL is not absolute
    /// `http`/`https` or the client cannot be built.
    pub fn new(upstream: &str, connect_timeout: Duration) -> Result<Self, ProxyError> {
        let base =
            Url::parse(upstream).map_err(|err| ProxyError::InvalidUpstream(err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            let scheme = base.scheme();
            return Err(ProxyError::InvalidUpstream(format!("unsupported scheme {scheme}")));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ProxyError::InvalidUpstream(err.to_string()))?;
        Ok(Self { base, client })
    }

    /// Returns the upstream URL for an inbound request target.
    #[must_use]
    pub fn target_url(&self, uri: &Uri) -> Url {
        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{}", uri.path()));
        url.set_query(uri.query());
        url
    }

    /// Forwards one request and relays the upstream response.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError`] when the body cannot be buffered or the
    /// upstream exchange fails.
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();
        // Already bounded by the gate's capture limit.
        let body =
            to_bytes(body, usize::MAX).await.map_err(|err| ProxyError::Body(err.to_string()))?;
        let upstream = self
            .client
            .request(parts.method, self.target_url(&parts.uri))
            .headers(end_to_end_headers(&parts.headers, true))
            .body(body)
            .send()
            .await
            .map_err(|err| ProxyError::Upstream(err.without_url().to_string()))?;
        let status = upstream.status();
        let headers = end_to_end_headers(upstream.headers(), false);
        let payload = upstream
            .bytes()
            .await
            .map_err(|err| ProxyError::Upstream(err.without_url().to_string()))?;
        let mut response = Response::new(Body::from(payload));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }

    /// Router that sends every path to this proxy.
    #[must_use]
    pub fn router(self) -> Router {
        Router::new().fallback(proxy_request).with_state(self)
    }
}

/// Axum handler forwarding to the upstream.
async fn proxy_request(State(proxy): State<UpstreamProxy>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    match proxy.forward(request).await {
        Ok(response) => response,
        Err(err) => {
            error!(%method, %path, error = %err, "upstream forwarding failed");
            bad_gateway_response()
        }
    }
}

/// Fixed `502 Bad Gateway` response.
#[must_use]
pub fn bad_gateway_response() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        BAD_GATEWAY_BODY,
    )
        .into_response()
}

// ============================================================================
// SECTION: Header Filtering
// ============================================================================

/// Returns true for headers that must not cross the proxy.
#[must_use]
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Copies headers that may cross the proxy.
///
/// `Host` is dropped from requests so the client sets the upstream host.
/// `Content-Length` is always recomputed from the buffered body.
#[must_use]
pub fn end_to_end_headers(headers: &HeaderMap, outbound: bool) -> HeaderMap {
    let connection_tokens: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name)
            || name == header::CONTENT_LENGTH
            || (outbound && name == header::HOST)
            || connection_tokens.iter().any(|token| token == name.as_str())
        {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}
