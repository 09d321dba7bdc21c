//! "Proxy event" version of the assessment intake Lambda.
//!
//! This executable defines a server that expects to be interacted with
//! according to AWS API Gateway's "proxy event" protocol. This adds an
//! additional layer of complexity beyond simple JSON-in, JSON-out, but it is
//! the only mode that carries real HTTP semantics (the request method and
//! response status codes), which the intake endpoint needs. The "bare"
//! version of the server is simpler and is more useful for local testing.

use lambda_http::{run, service_fn, Error, Request};

use assessment_intake_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(
        |req: Request| async move { ref_svcs.handle(req).await },
    ))
    .await?;
    Ok(())
}
