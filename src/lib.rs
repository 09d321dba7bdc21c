//! The Lambda-powered assessment intake service
//!
//! This library crate implements the intake endpoint for the combined PSS +
//! PSYCHLOPS assessment form. The common codebase is compiled into two
//! different executables: `assessment-intake-lambda-bare` and
//! `assessment-intake-lambda-proxyevent`. The former is useful for local
//! testing, while the latter has support for the more complex AWS API
//! Gateway "proxy event" framework that we use for our actual cloud
//! deployment.
//!
//! The work per invocation is deliberately small: parse one JSON body, make
//! at most two sequential HTTPS calls to Airtable (a best-effort member
//! lookup, then the record creation), and answer with JSON. Responses stay
//! far inside the buffered-Lambda limits, so we never need streaming mode.

use lambda_http::http::Method;
use lambda_http::{Body, Request, Response};
use lambda_runtime::Error;
use serde_json::Value;
use tracing::error;

mod airtable;
mod config;
mod submission;
mod submit;

use config::Config;

pub struct Services {
    http: reqwest::Client,
}

impl Services {
    /// Create a state object for the assessment intake Lambda.
    pub async fn init() -> Result<Self, Error> {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_target(false) // don't print the module name
            .without_time() // don't print time (CloudWatch has it)
            .init();

        Ok(Services::new())
    }

    /// As [`Services::init`], but without installing the tracing subscriber.
    pub fn new() -> Self {
        Services {
            http: reqwest::Client::new(),
        }
    }

    /// Handle one HTTP invocation of the intake endpoint.
    ///
    /// The endpoint is POST-only. Configuration is resolved here, per
    /// invocation, so that a misdeployed function answers 500 cleanly
    /// instead of dying in its init loop; the 500 is deliberately vague
    /// about what exactly is missing.
    pub async fn handle(&self, req: Request) -> Result<Response<Body>, Error> {
        if req.method() != Method::POST {
            return Ok(Response::builder()
                .status(405)
                .body(Body::Text("Method Not Allowed".to_owned()))?);
        }

        let config = match Config::from_env() {
            Ok(config) => config,
            Err(err) => {
                error!("refusing request: {err}");
                return json_response(
                    500,
                    &serde_json::json!({ "error": "Server configuration error" }),
                );
            }
        };

        let store = airtable::Client::new(self.http.clone(), config);
        let outcome = submit::handle_submission(&store, req.body()).await;
        json_response(outcome.status, &outcome.body)
    }

    /// Bare JSON-in/JSON-out entry point for local testing, where there is
    /// no HTTP layer: the event payload stands in for the POST body and the
    /// status code only appears in the logs.
    pub async fn handle_bare(&self, payload: Option<Value>) -> Result<Value, Error> {
        let body = match payload {
            Some(p) => serde_json::to_vec(&p)?,
            None => Vec::new(),
        };

        let config = match Config::from_env() {
            Ok(config) => config,
            Err(err) => {
                error!("refusing request: {err}");
                println!("*** status=500");
                return Ok(serde_json::json!({ "error": "Server configuration error" }));
            }
        };

        let store = airtable::Client::new(self.http.clone(), config);
        let outcome = submit::handle_submission(&store, &body).await;
        println!("*** status={}", outcome.status);
        Ok(outcome.body)
    }
}

impl Default for Services {
    fn default() -> Self {
        Services::new()
    }
}

fn json_response(status: u16, body: &Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::Text(body.to_string()))?)
}
