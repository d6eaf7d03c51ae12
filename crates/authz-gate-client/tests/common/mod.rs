// crates/authz-gate-client/tests/common/mod.rs
// ============================================================================
// Module: Client Test Helpers
// Description: Fake decision service backed by tiny_http.
// Purpose: Serve scripted verdicts on loopback and record received queries.
// Dependencies: tiny_http, url
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
use std::thread;
use std::thread::JoinHandle;

use tiny_http::Response;
use tiny_http::Server;
use url::Url;

/// Request observed by the fake decision service.
#[derive(Debug, Clone)]
pub struct ObservedQuery {
    /// HTTP method label.
    pub method: String,
    /// Request path without query.
    pub path: String,
    /// Decoded `input` query parameter, when present.
    pub input: Option<String>,
    /// Number of query parameters received.
    pub param_count: usize,
    /// Whether the request carried a non-empty body.
    pub had_body: bool,
}

/// Scripted response: status code and body.
pub type Scripted = (u16, String);

/// Fake decision service bound to an ephemeral loopback port.
pub struct FakeDecisionService {
    addr: SocketAddr,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    observed: Arc<Mutex<Vec<ObservedQuery>>>,
}

impl FakeDecisionService {
    /// Starts a fake service that answers every request with `respond`.
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&ObservedQuery) -> Scripted + Send + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let worker_server = Arc::clone(&server);
        let worker_observed = Arc::clone(&observed);
        let handle = thread::spawn(move || {
            for mut request in worker_server.incoming_requests() {
                let mut body = Vec::new();
                let _ = request.as_reader().read_to_end(&mut body);
                let query = observe(request.method().as_str(), request.url(), !body.is_empty());
                let (status, payload) = respond(&query);
                worker_observed.lock().unwrap().push(query);
                let response = Response::from_string(payload).with_status_code(status);
                let _ = request.respond(response);
            }
        });
        Self {
            addr,
            server,
            handle: Some(handle),
            observed,
        }
    }

    /// Returns the base URL of the decision endpoint.
    pub fn url(&self) -> String {
        format!("http://{}/v1/data/httpapi/authz", self.addr)
    }

    /// Returns every query observed so far.
    pub fn observed(&self) -> Vec<ObservedQuery> {
        self.observed.lock().unwrap().clone()
    }
}

impl Drop for FakeDecisionService {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn observe(method: &str, raw_url: &str, had_body: bool) -> ObservedQuery {
    let url = Url::parse(&format!("http://fake.local{raw_url}")).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let input = pairs.iter().find(|(key, _)| key == "input").map(|(_, value)| value.clone());
    ObservedQuery {
        method: method.to_string(),
        path: url.path().to_string(),
        input,
        param_count: pairs.len(),
        had_body,
    }
}
