// crates/authz-gate-client/src/client.rs
// ============================================================================
// Module: HTTP Decision Client
// Description: Decision client for GET-style policy decision endpoints.
// Purpose: Transmit decision inputs and decode verdicts with strict limits.
// Dependencies: authz-gate-core, reqwest, tracing, url
// ============================================================================

//! ## Overview
//! The HTTP decision client issues `GET <endpoint>?input=<json>` requests,
//! where `<json>` is the canonical JSON encoding of the decision input.
//! Invariants:
//! - Redirects are not followed; a redirect is a non-success status.
//! - Non-2xx statuses, oversized bodies, and malformed verdicts are errors.
//! - `timeout_ms` bounds the full request lifecycle.
//! - Transport error text never includes the request URL, since the URL
//!   embeds the caller's `Authorization` value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use authz_gate_core::DEFAULT_DECISION_TIMEOUT_MS;
use authz_gate_core::DEFAULT_DECISION_URL;
use authz_gate_core::DEFAULT_MAX_RESPONSE_BYTES;
use authz_gate_core::DEFAULT_USER_AGENT;
use authz_gate_core::DecisionClient;
use authz_gate_core::DecisionError;
use authz_gate_core::DecisionInput;
use authz_gate_core::Verdict;
use authz_gate_core::parse_verdict;
use reqwest::Client;
use reqwest::Response;
use reqwest::redirect::Policy;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Query parameter carrying the encoded decision input.
pub const INPUT_QUERY_PARAM: &str = "input";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP decision client.
///
/// # Invariants
/// - `url` must be an absolute `http` or `https` URL.
/// - `max_response_bytes` is a hard upper bound on verdict bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpDecisionClientConfig {
    /// Decision endpoint URL.
    pub url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum verdict body size, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpDecisionClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DECISION_URL.to_string(),
            timeout_ms: DEFAULT_DECISION_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

/// Decision client backed by a shared reqwest client.
///
/// # Invariants
/// - The endpoint and client are fixed at construction and shared read-only.
#[derive(Debug, Clone)]
pub struct HttpDecisionClient {
    /// Parsed decision endpoint.
    endpoint: Url,
    /// Shared HTTP client; cloning shares the connection pool.
    client: Client,
    /// Maximum verdict body size, in bytes.
    max_response_bytes: usize,
}

impl HttpDecisionClient {
    /// Creates a decision client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::InvalidEndpoint`] when the URL is unusable and
    /// [`DecisionError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &HttpDecisionClientConfig) -> Result<Self, DecisionError> {
        let endpoint = parse_endpoint(&config.url)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| DecisionError::Transport(format!("http client build failed: {err}")))?;
        Ok(Self {
            endpoint,
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the configured decision endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the full decision URL for an input.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Serialize`] when the input cannot be encoded.
    pub fn decision_url(&self, input: &DecisionInput) -> Result<Url, DecisionError> {
        let encoded = input.to_canonical_json()?;
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(INPUT_QUERY_PARAM, &encoded);
        Ok(url)
    }
}

#[async_trait]
impl DecisionClient for HttpDecisionClient {
    async fn decide(&self, input: &DecisionInput) -> Result<Verdict, DecisionError> {
        let url = self.decision_url(input)?;
        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DecisionError::Transport(err.without_url().to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let _ = read_response_limited(response, self.max_response_bytes).await;
            return Err(DecisionError::Status(status.as_u16()));
        }
        let body = read_response_limited(response, self.max_response_bytes).await?;
        let verdict = parse_verdict(&body)?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms,
            verdict = verdict.as_str(),
            "decision retrieved"
        );
        Ok(verdict)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates the decision endpoint URL.
fn parse_endpoint(raw: &str) -> Result<Url, DecisionError> {
    let url = Url::parse(raw).map_err(|err| DecisionError::InvalidEndpoint(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(DecisionError::InvalidEndpoint(format!("unsupported url scheme: {scheme}"))),
    }
}

/// Drains the response body while enforcing a byte limit.
async fn read_response_limited(
    mut response: Response,
    max_bytes: usize,
) -> Result<Vec<u8>, DecisionError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| DecisionError::Transport("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(DecisionError::ResponseTooLarge {
            max_bytes,
        });
    }
    let mut buf = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|err| DecisionError::Transport(err.without_url().to_string()))?
    {
        if buf.len().saturating_add(chunk.len()) > max_bytes {
            return Err(DecisionError::ResponseTooLarge {
                max_bytes,
            });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
