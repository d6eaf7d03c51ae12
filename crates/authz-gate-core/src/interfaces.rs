// crates/authz-gate-core/src/interfaces.rs
// ============================================================================
// Module: Authz Gate Interfaces
// Description: Backend-agnostic interface for decision retrieval.
// Purpose: Let the gate depend on a capability rather than a concrete client.
// Dependencies: async-trait, crate::input, crate::verdict
// ============================================================================

//! ## Overview
//! The gate asks a [`DecisionClient`] for a verdict and never talks to the
//! network itself. Deployments inject an HTTP client; tests inject fakes.
//!
//! Security posture: implementations must fail closed. Any response that is
//! not a well-formed verdict is an error, never an allow.

use async_trait::async_trait;

use crate::error::DecisionError;
use crate::input::DecisionInput;
use crate::verdict::Verdict;

// ============================================================================
// SECTION: Decision Client
// ============================================================================

/// Retrieves verdicts for decision inputs.
///
/// # Invariants
/// - Implementations are shared across concurrent requests and hold no
///   per-request mutable state.
/// - Dropping the returned future cancels the in-flight decision call.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// Returns the verdict for the provided input.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when the verdict cannot be retrieved.
    async fn decide(&self, input: &DecisionInput) -> Result<Verdict, DecisionError>;
}
