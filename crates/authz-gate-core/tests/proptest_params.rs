// crates/authz-gate-core/tests/proptest_params.rs
// ============================================================================
// Module: Parameter Parsing Property Tests
// Description: Property tests for query and form parameter extraction.
// Purpose: Ensure encoded parameters survive normalization unchanged.
// Dependencies: authz-gate-core, proptest, url
// ============================================================================

//! ## Overview
//! Generates arbitrary parameter lists, encodes them the way clients do, and
//! checks the decision input recovers them with the documented cardinality.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use authz_gate_core::DecisionInput;
use http::Method;
use http::Request;
use proptest::prelude::*;
use url::form_urlencoded;

fn encode_pairs(pairs: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-c]{1,2}", "\\PC{0,8}"), 0..8)
}

proptest! {
    #[test]
    fn query_params_keep_every_value_in_order(pairs in pairs_strategy()) {
        let query = encode_pairs(&pairs);
        let uri = if query.is_empty() { "/p".to_string() } else { format!("/p?{query}") };
        let req = Request::builder().method(Method::GET).uri(uri).body(()).unwrap();
        let input = DecisionInput::from_request(&req, b"");

        let mut expected: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in &pairs {
            expected.entry(key.clone()).or_default().push(value.clone());
        }
        prop_assert_eq!(input.http.query_params, expected);
    }

    #[test]
    fn post_form_params_keep_first_value(pairs in pairs_strategy()) {
        let body = encode_pairs(&pairs);
        let req = Request::builder().method(Method::POST).uri("/p").body(()).unwrap();
        let input = DecisionInput::from_request(&req, body.as_bytes());

        let mut expected: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in &pairs {
            expected.entry(key.clone()).or_insert_with(|| value.clone());
        }
        prop_assert_eq!(input.http.form_params, expected);
        prop_assert_eq!(input.http.body, body);
    }

    #[test]
    fn non_post_methods_never_carry_form_params(pairs in pairs_strategy()) {
        let body = encode_pairs(&pairs);
        for method in [Method::GET, Method::PUT, Method::PATCH, Method::DELETE] {
            let req = Request::builder().method(method).uri("/p").body(()).unwrap();
            let input = DecisionInput::from_request(&req, body.as_bytes());
            prop_assert!(input.http.form_params.is_empty());
        }
    }
}
