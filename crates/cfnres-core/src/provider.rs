// One event in, exactly one response out
//
// CustomResourceProvider ties the dispatcher to a transport. It is shared
// across concurrent invocations; all per-invocation state lives on the stack
// of handle().

use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument, Span};

use crate::dispatcher::Dispatcher;
use crate::emitter::{OnceEmitter, ResponseEmitter};
use crate::error::EmitError;
use crate::event::LifecycleEvent;
use crate::registry::Registry;
use crate::response::{Response, ResponseDocument, MAX_RESPONSE_BYTES};

/// Knobs applied when building response documents
#[derive(Debug, Clone)]
pub struct ResponseOptions {
    pub max_reason_bytes: usize,
    /// Used as PhysicalResourceId when neither the handler nor the event has one
    pub fallback_physical_id: Option<String>,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            max_reason_bytes: MAX_RESPONSE_BYTES / 2,
            fallback_physical_id: None,
        }
    }
}

pub struct CustomResourceProvider {
    dispatcher: Dispatcher,
    emitter: Arc<dyn ResponseEmitter>,
    options: ResponseOptions,
}

impl CustomResourceProvider {
    pub fn new(registry: Arc<Registry>, emitter: Arc<dyn ResponseEmitter>) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
            emitter,
            options: ResponseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResponseOptions) -> Self {
        self.options = options;
        self
    }

    /// Dispatch `event` and deliver its response to `ResponseURL`.
    ///
    /// Handler failures come back as `Ok(Response::Failed)`; only a failed
    /// delivery is an error.
    pub async fn handle(&self, event: &LifecycleEvent) -> Result<Response, EmitError> {
        async move {
            info!("Received custom resource request");
            let response = self.dispatcher.dispatch(event).await;
            self.deliver(event, response).await
        }
        .instrument(event_span(event))
        .await
    }

    /// Answer FAILED without dispatching, for events that cannot be decoded
    /// as a whole (see [`LifecycleEvent::salvage`]).
    pub async fn reject(
        &self,
        event: &LifecycleEvent,
        reason: impl Into<String>,
    ) -> Result<Response, EmitError> {
        let response = Response::failed(reason);
        async move {
            warn!(
                reason = response.reason().unwrap_or_default(),
                "Rejecting malformed custom resource request"
            );
            self.deliver(event, response).await
        }
        .instrument(event_span(event))
        .await
    }

    async fn deliver(
        &self,
        event: &LifecycleEvent,
        response: Response,
    ) -> Result<Response, EmitError> {
        let document = ResponseDocument::build(
            event,
            response.clone(),
            self.options.fallback_physical_id.as_deref(),
            self.options.max_reason_bytes,
        );

        let once = OnceEmitter::new(self.emitter.as_ref());
        match once.emit(&event.response_url, &document).await {
            Ok(()) => {
                info!(
                    status = %document.status,
                    physical_resource_id = %document.physical_resource_id,
                    "Sent custom resource response"
                );
                Ok(response)
            }
            Err(err) => {
                error!(
                    status = %document.status,
                    "Failed to deliver custom resource response: {}",
                    err
                );
                Err(err)
            }
        }
    }
}

fn event_span(event: &LifecycleEvent) -> Span {
    info_span!(
        "custom_resource",
        request_id = %event.request_id,
        request_type = %event.request_type,
        resource_type = %event.resource_type,
        logical_resource_id = %event.logical_resource_id,
    )
}
