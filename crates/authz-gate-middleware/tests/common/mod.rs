// crates/authz-gate-middleware/tests/common/mod.rs
// ============================================================================
// Module: Gate Test Helpers
// Description: Loopback policy service and gate wiring for end-to-end tests.
// Purpose: Evaluate decoded decision inputs with scripted policies.
// Dependencies: authz-gate-client, authz-gate-middleware, serde_json, tiny_http, url
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    dead_code,
    reason = "Shared test fixtures; not every helper is used by every suite."
)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;

use authz_gate_client::HttpDecisionClient;
use authz_gate_client::HttpDecisionClientConfig;
use authz_gate_middleware::AuthzGate;
use authz_gate_middleware::protect;
use axum::Router;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

/// Policy evaluated by the fake service: decoded input to (status, body).
pub type Policy = fn(Option<&Value>) -> (u16, String);

/// Fake policy service bound to an ephemeral loopback port.
pub struct FakePolicyService {
    addr: SocketAddr,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    inputs: Arc<Mutex<Vec<Value>>>,
}

impl FakePolicyService {
    /// Starts a service answering every query with `policy`.
    pub fn start(policy: Policy) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let inputs = Arc::new(Mutex::new(Vec::new()));
        let worker_server = Arc::clone(&server);
        let worker_inputs = Arc::clone(&inputs);
        let handle = thread::spawn(move || {
            for request in worker_server.incoming_requests() {
                let input = decode_input(request.url());
                if let Some(value) = &input {
                    worker_inputs.lock().unwrap().push(value.clone());
                }
                let (status, payload) = policy(input.as_ref());
                let _ = request.respond(Response::from_string(payload).with_status_code(status));
            }
        });
        Self {
            addr,
            server,
            handle: Some(handle),
            inputs,
        }
    }

    /// Returns the decision endpoint URL.
    pub fn url(&self) -> String {
        format!("http://{}/v1/data/httpapi/authz", self.addr)
    }

    /// Returns every decoded input received so far.
    pub fn inputs(&self) -> Vec<Value> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Drop for FakePolicyService {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn decode_input(raw_url: &str) -> Option<Value> {
    let url = Url::parse(&format!("http://fake.local{raw_url}")).ok()?;
    let (_, raw) = url.query_pairs().find(|(key, _)| key == "input")?;
    serde_json::from_str(&raw).ok()
}

/// Allow body used by policies.
pub fn allow() -> (u16, String) {
    (200, r#"{"result": {"allow": true}}"#.to_string())
}

/// Deny body used by policies.
pub fn deny() -> (u16, String) {
    (200, r#"{"result": {"allow": false}}"#.to_string())
}

/// Returns a string field under `input.http`.
pub fn http_field<'a>(input: &'a Value, field: &str) -> &'a str {
    input["http"][field].as_str().unwrap_or_default()
}

/// Downstream that echoes the request body with `200 OK` and counts calls.
#[derive(Default)]
pub struct Downstream {
    /// Number of times the downstream handler ran.
    pub hits: Arc<AtomicUsize>,
}

impl Downstream {
    /// Creates a downstream with a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of downstream invocations.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Builds the echo router.
    pub fn router(&self) -> Router {
        let hits = Arc::clone(&self.hits);
        Router::new().fallback(move |body: Bytes| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::OK, body)
            }
        })
    }
}

/// Builds a gated router over `downstream` that consults `policy_url`.
pub fn gated_router(policy_url: &str, downstream: &Downstream, max_body_bytes: usize) -> Router {
    let config = HttpDecisionClientConfig {
        url: policy_url.to_string(),
        timeout_ms: 2_000,
        ..HttpDecisionClientConfig::default()
    };
    let client = HttpDecisionClient::new(&config).unwrap();
    protect(downstream.router(), AuthzGate::new(Arc::new(client), max_body_bytes))
}
