// crates/authz-gate-cli/src/server.rs
// ============================================================================
// Module: Gate Server
// Description: Wiring for the gated reverse proxy.
// Purpose: Turn a validated GateConfig into a running axum server.
// Dependencies: authz-gate-client, authz-gate-config, authz-gate-middleware, axum, tokio
// ============================================================================

//! ## Overview
//! [`build_app`] composes the decision client, the gate, and the upstream
//! proxy. [`serve`] binds the configured address and runs until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use authz_gate_client::HttpDecisionClient;
use authz_gate_client::HttpDecisionClientConfig;
use authz_gate_config::DecisionConfig;
use authz_gate_config::GateConfig;
use authz_gate_core::DecisionError;
use authz_gate_middleware::AuthzGate;
use authz_gate_middleware::protect;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;
use tracing::warn;

use crate::proxy::ProxyError;
use crate::proxy::UpstreamProxy;

/// Server setup and runtime failures.
#[derive(Debug, Error)]
pub enum ServeError {
    /// `server.upstream` is not configured.
    #[error("server.upstream is required to serve")]
    MissingUpstream,
    /// Configuration is unusable.
    #[error("invalid server config: {0}")]
    Config(String),
    /// Decision client could not be built.
    #[error(transparent)]
    Decision(#[from] DecisionError),
    /// Upstream proxy could not be built.
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    /// Listener or server IO failed.
    #[error("server io error: {0}")]
    Io(String),
}

/// Maps the decision config section onto client settings.
#[must_use]
pub fn decision_client_config(config: &DecisionConfig) -> HttpDecisionClientConfig {
    HttpDecisionClientConfig {
        url: config.url.clone(),
        timeout_ms: config.timeout_ms,
        max_response_bytes: config.max_response_bytes,
        user_agent: config.user_agent.clone(),
    }
}

/// Builds the gated proxy router.
///
/// # Errors
///
/// Returns [`ServeError`] when the upstream is missing or a client cannot be
/// constructed.
pub fn build_app(config: &GateConfig) -> Result<Router, ServeError> {
    let upstream = config.server.upstream.as_deref().ok_or(ServeError::MissingUpstream)?;
    let client = HttpDecisionClient::new(&decision_client_config(&config.decision))?;
    let connect_timeout = Duration::from_millis(config.server.upstream_connect_timeout_ms);
    let proxy = UpstreamProxy::new(upstream, connect_timeout)?;
    let gate = AuthzGate::new(Arc::new(client), config.request.max_body_bytes);
    Ok(protect(proxy.router(), gate))
}

/// Runs the gate server until shutdown.
///
/// # Errors
///
/// Returns [`ServeError`] when setup fails or the listener errors.
pub async fn serve(config: &GateConfig) -> Result<(), ServeError> {
    let addr = config.server.bind_addr().map_err(|err| ServeError::Config(err.to_string()))?;
    let app = build_app(config)?;
    let listener = TcpListener::bind(addr).await.map_err(|err| ServeError::Io(err.to_string()))?;
    let local = listener.local_addr().map_err(|err| ServeError::Io(err.to_string()))?;
    info!(
        bind = %local,
        decision_url = %config.decision.url,
        upstream = config.server.upstream.as_deref().unwrap_or_default(),
        "authz gate listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| ServeError::Io(err.to_string()))
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
