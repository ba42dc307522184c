// AWS Lambda runtime adapter
//
// Receives CloudFormation custom-resource events, dispatches them through the
// registry and PUTs exactly one response document to the event's ResponseURL.
//
// Philosophy: Use lambda_runtime's provided tokio
// We don't add our own tokio - lambda_runtime provides it

use std::sync::Arc;

use cfnres_config::{Platform, RuntimeConfig};
use cfnres_core::{CustomResourceProvider, LifecycleEvent, Registry, ResponseOptions};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, Instrument};

pub mod emitter;
pub mod hello;
mod init;
pub mod resources;

pub use emitter::HttpEmitter;

/// Lambda handler for custom-resource events
async fn handle_request(
    event: LambdaEvent<Value>,
    provider: &CustomResourceProvider,
) -> Result<Value, Error> {
    let (payload, context) = event.into_parts();
    let span = tracing::info_span!("invocation", lambda_request_id = %context.request_id);
    handle_payload(payload, provider).instrument(span).await
}

/// Parse a raw event payload and run it through `provider`.
///
/// A payload that does not parse but still carries a ResponseURL is answered
/// with FAILED before the invocation error is returned. Otherwise an error
/// means no response could be delivered.
pub async fn handle_payload(
    payload: Value,
    provider: &CustomResourceProvider,
) -> Result<Value, Error> {
    let event = match LifecycleEvent::deserialize(&payload) {
        Ok(event) => event,
        Err(e) => return reject_payload(&payload, e, provider).await,
    };

    let response = provider
        .handle(&event)
        .await
        .map_err(|e| Error::from(format!("Failed to deliver response: {}", e)))?;

    Ok(json!({ "Status": response.status().as_str() }))
}

async fn reject_payload(
    payload: &Value,
    parse_error: serde_json::Error,
    provider: &CustomResourceProvider,
) -> Result<Value, Error> {
    let reason = format!("Invalid custom resource event: {}", parse_error);
    error!("Payload is not a CloudFormation custom resource event: {}", parse_error);

    let Some(event) = LifecycleEvent::salvage(payload) else {
        return Err(Error::from(reason));
    };

    if let Err(e) = provider.reject(&event, reason.clone()).await {
        return Err(Error::from(format!("{}; failed to deliver response: {}", reason, e)));
    }
    Err(Error::from(reason))
}

/// Assemble the provider from configuration and a frozen registry
pub fn build_provider(
    config: &RuntimeConfig,
    registry: Arc<Registry>,
) -> Result<CustomResourceProvider, Error> {
    let emitter = HttpEmitter::new(&config.response)
        .map_err(|e| Error::from(format!("Failed to initialize response emitter: {:#}", e)))?;

    let options = ResponseOptions {
        max_reason_bytes: config.response.max_reason_bytes,
        fallback_physical_id: config
            .lambda
            .as_ref()
            .and_then(|lambda| lambda.log_stream_name.clone()),
    };

    Ok(CustomResourceProvider::new(registry, Arc::new(emitter)).with_options(options))
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load_for_platform(Platform::Lambda)
        .map_err(|e| Error::from(format!("Failed to load configuration: {:#}", e)))?;
    init::init_tracing(&config);

    let function_name = config
        .lambda
        .as_ref()
        .and_then(|lambda| lambda.function_name.as_deref())
        .unwrap_or("unknown");
    info!(
        function_name,
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("CFNRES_GIT_HASH"),
        build_timestamp = env!("CFNRES_BUILD_TIMESTAMP"),
        "Starting custom resource backend"
    );

    let registry = resources::registry()
        .map_err(|e| Error::from(format!("Failed to register resource types: {}", e)))?;
    info!(
        resource_types = ?registry.resource_types(),
        "Registered custom resource types"
    );

    let provider = Arc::new(build_provider(&config, Arc::new(registry))?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let provider = provider.clone();
        async move { handle_request(event, &provider).await }
    }))
    .await
}
