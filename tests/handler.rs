//! Endpoint-level tests for the paths that must never make an outbound
//! call: wrong method, missing credential, unparseable body. All of these
//! are decided before the Airtable client is ever used, so they are safe to
//! exercise against the real handler with no network.

use lambda_http::http::{self, Method};
use lambda_http::{Body, Request};
use serde_json::{json, Value};
use std::sync::Mutex;

use assessment_intake_lambda::Services;

// These tests mutate process-wide environment variables, so they must not
// interleave.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn request(method: Method, body: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri("/submit-assessment")
        .body(Body::Text(body.to_owned()))
        .unwrap()
}

fn body_json(body: &Body) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn non_post_methods_get_a_bare_405() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let svcs = Services::new();
    for method in [Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS] {
        let resp = svcs
            .handle(request(method, r#"{"email":"a@x.com"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);
        assert_eq!(String::from_utf8_lossy(resp.body()), "Method Not Allowed");
    }
}

#[tokio::test]
async fn missing_credential_is_a_generic_500_regardless_of_body() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::remove_var("AIRTABLE_TOKEN");

    let svcs = Services::new();
    for body in [r#"{"email":"a@x.com"}"#, "{not json", ""] {
        let resp = svcs.handle(request(Method::POST, body)).await.unwrap();
        assert_eq!(resp.status(), 500);
        assert_eq!(
            body_json(resp.body()),
            json!({ "error": "Server configuration error" })
        );
    }
}

#[tokio::test]
async fn empty_credential_fails_closed_like_a_missing_one() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("AIRTABLE_TOKEN", "");

    let svcs = Services::new();
    let resp = svcs
        .handle(request(Method::POST, r#"{"email":"a@x.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    std::env::remove_var("AIRTABLE_TOKEN");
}

#[tokio::test]
async fn bare_entry_point_keeps_the_config_error_generic() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::remove_var("AIRTABLE_TOKEN");

    let svcs = Services::new();
    let body = svcs
        .handle_bare(Some(json!({ "email": "a@x.com" })))
        .await
        .unwrap();
    // The reason the credential is unusable stays in the logs.
    assert_eq!(body, json!({ "error": "Server configuration error" }));
}

#[tokio::test]
async fn malformed_body_is_a_400_before_any_outbound_call() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("AIRTABLE_TOKEN", "patTESTONLY");

    let svcs = Services::new();
    for body in ["{not json", "[1, 2, 3]", "null", ""] {
        let resp = svcs.handle(request(Method::POST, body)).await.unwrap();
        assert_eq!(resp.status(), 400, "body {body:?} should be rejected");
        assert_eq!(body_json(resp.body()), json!({ "error": "Invalid JSON" }));
    }

    std::env::remove_var("AIRTABLE_TOKEN");
}
