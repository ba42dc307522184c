// Hello-world Lambda function deployed next to the custom resource backend

use cfnres_config::{Platform, RuntimeConfig};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{info, info_span};

pub const GREETING: &str = "Hello World 👋. Welcome to AWS Lambda! 🙌🎉🍾";

/// Greet the caller, logging under a request-scoped span
pub fn greet(request_id: &str) -> String {
    let _span = info_span!("hello_world", request_id = %request_id).entered();
    info!("Accessing request-scoped log, with request ID field");
    GREETING.to_string()
}

async fn hello_world(event: LambdaEvent<Value>) -> Result<String, Error> {
    Ok(greet(&event.context.request_id))
}

/// Entry point for the `hello-world` binary
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load_for_platform(Platform::Lambda)
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;
    crate::init::init_tracing(&config);
    info!("Accessing structured logger 🙌");

    lambda_runtime::run(service_fn(hello_world)).await
}
