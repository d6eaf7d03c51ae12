// crates/authz-gate-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Helpers
// Description: tiny_http fakes for the decision service and the upstream.
// Purpose: Give CLI and server tests loopback peers with recorded traffic.
// Dependencies: tiny_http
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    dead_code,
    reason = "Shared test fixtures; not every helper is used by every suite."
)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Request recorded by a fake peer.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Method label.
    pub method: String,
    /// Raw request target (path and query).
    pub url: String,
    /// Lowercased header names with values.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Recorded {
    /// Returns the first value of a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }
}

/// Scripted reply: status, extra headers, body.
pub type Reply = (u16, Vec<(&'static str, &'static str)>, String);

/// Fake HTTP peer bound to an ephemeral loopback port.
pub struct FakePeer {
    addr: SocketAddr,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl FakePeer {
    /// Starts a peer answering every request with `reply`.
    pub fn start<F>(reply: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let worker_server = Arc::clone(&server);
        let worker_recorded = Arc::clone(&recorded);
        let handle = thread::spawn(move || {
            for mut request in worker_server.incoming_requests() {
                let mut body = Vec::new();
                let _ = request.as_reader().read_to_end(&mut body);
                let seen = Recorded {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|header| {
                            (
                                header.field.as_str().as_str().to_ascii_lowercase(),
                                header.value.as_str().to_string(),
                            )
                        })
                        .collect(),
                    body,
                };
                let (status, headers, payload) = reply(&seen);
                worker_recorded.lock().unwrap().push(seen);
                let mut response = Response::from_string(payload).with_status_code(status);
                for (name, value) in headers {
                    response.add_header(Header::from_bytes(name, value).unwrap());
                }
                let _ = request.respond(response);
            }
        });
        Self {
            addr,
            server,
            handle: Some(handle),
            recorded,
        }
    }

    /// Returns `http://addr` joined with `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Returns all recorded requests.
    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Drop for FakePeer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Decision service path used by tests.
pub const DECISION_PATH: &str = "/v1/data/httpapi/authz";

/// Reply allowing the request.
pub fn allow_reply() -> Reply {
    (200, vec![("Content-Type", "application/json")], r#"{"result":{"allow":true}}"#.to_string())
}

/// Reply denying the request.
pub fn deny_reply() -> Reply {
    (200, vec![("Content-Type", "application/json")], r#"{"result":{"allow":false}}"#.to_string())
}

/// Path of the compiled CLI binary.
pub fn authz_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_authz-gate"))
}
