// crates/authz-gate-cli/src/lib.rs
// ============================================================================
// Module: Authz Gate CLI Library
// Description: Building blocks behind the `authz-gate` binary.
// Purpose: Keep command logic testable outside the process entry point.
// Dependencies: authz-gate-*, axum, reqwest, tracing-subscriber
// ============================================================================

//! ## Overview
//! - [`server`] assembles the gated reverse proxy run by `authz-gate serve`.
//! - [`proxy`] forwards allowed requests to the single configured upstream.
//! - [`check`] builds one decision input from flags for `authz-gate check`.
//! - [`logging`] installs the process-wide `tracing` subscriber.

pub mod check;
pub mod logging;
pub mod proxy;
pub mod server;
