//! "Bare" version of the assessment intake Lambda.
//!
//! This executable defines a server that you can easily interact with
//! locally: the event payload is treated as the posted form body, and the
//! HTTP status that the cloud deployment would return only shows up in the
//! logs. For the cloud deployment, we need to use the "proxy event" version,
//! which has additional infrastructure to interact with AWS API Gateway's
//! "proxy event" framework.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;

use assessment_intake_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(|event: LambdaEvent<Value>| async move {
        let (payload, _context) = event.into_parts();
        ref_svcs.handle_bare(Some(payload)).await
    }))
    .await?;
    Ok(())
}
