// Lifecycle dispatcher
//
// Decodes an event, selects Create/Update/Delete and normalizes every
// outcome (decode errors, unknown verbs, handler errors, handler panics)
// into a Response. Nothing raised by handler code propagates past dispatch().

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::decoder::decode;
use crate::error::DispatchError;
use crate::event::{LifecycleEvent, LifecycleVerb};
use crate::handler::HandlerOutcome;
use crate::registry::Registry;
use crate::response::Response;

/// Stateless dispatcher over a frozen registry
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Handle one event. Always yields a well-formed response.
    pub async fn dispatch(&self, event: &LifecycleEvent) -> Response {
        match self.try_dispatch(event).await {
            Ok(outcome) => Response::from(outcome),
            Err(err) => {
                warn!(
                    error_kind = err.kind(),
                    resource_type = %event.resource_type,
                    request_type = %event.request_type,
                    "Custom resource request failed: {}",
                    err
                );
                Response::failed(err.to_string())
            }
        }
    }

    async fn try_dispatch(&self, event: &LifecycleEvent) -> Result<HandlerOutcome, DispatchError> {
        let decoded = std::panic::catch_unwind(AssertUnwindSafe(|| {
            decode(
                &self.registry,
                &event.resource_type,
                &event.resource_properties,
            )
        }));
        let handler = match decoded {
            Ok(result) => result?,
            Err(panic) => {
                return Err(DispatchError::HandlerPanicked {
                    verb: "decode",
                    message: panic_message(panic.as_ref()),
                });
            }
        };
        let verb = event.verb()?;

        debug!(
            verb = %verb,
            resource_type = %event.resource_type,
            "Invoking custom resource handler"
        );

        let invocation = match verb {
            LifecycleVerb::Create => handler.create(event),
            LifecycleVerb::Update => handler.update(event),
            LifecycleVerb::Delete => handler.delete(event),
        };

        match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => Err(DispatchError::HandlerFailure {
                verb: verb.as_str(),
                message: format!("{:#}", err),
            }),
            Err(panic) => Err(DispatchError::HandlerPanicked {
                verb: verb.as_str(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::handler::RequestHandler;
    use crate::properties::Properties;
    use crate::response::ResponseStatus;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static INVOCATIONS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Default)]
    struct Flaky {
        mode: String,
    }

    #[async_trait]
    impl RequestHandler for Flaky {
        fn decode(&mut self, properties: &Properties) -> Result<(), DecodeError> {
            self.mode = properties.required_str("Mode")?.to_string();
            Ok(())
        }

        async fn create(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
            INVOCATIONS.fetch_add(1, Ordering::SeqCst);
            match self.mode.as_str() {
                "error" => Err(anyhow::anyhow!("quota exceeded").context("creating widget")),
                "panic" => panic!("widget exploded"),
                _ => Ok(HandlerOutcome::empty().attribute("Mode", self.mode.clone())),
            }
        }

        async fn update(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
            INVOCATIONS.fetch_add(1, Ordering::SeqCst);
            Ok(HandlerOutcome::empty())
        }

        async fn delete(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
            INVOCATIONS.fetch_add(1, Ordering::SeqCst);
            Ok(HandlerOutcome::empty())
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut builder = Registry::builder();
        builder.register_default::<Flaky>("Demo::Flaky").unwrap();
        Dispatcher::new(Arc::new(builder.build()))
    }

    fn event(request_type: &str, mode: &str) -> LifecycleEvent {
        serde_json::from_value(json!({
            "RequestType": request_type,
            "ResponseURL": "https://example.com/response",
            "ResourceType": "Demo::Flaky",
            "LogicalResourceId": "Flaky",
            "ResourceProperties": { "Mode": mode }
        }))
        .unwrap()
    }

    // All assertions on INVOCATIONS live in this one test so parallel tests
    // in this module cannot race on the counter.
    #[tokio::test]
    async fn test_dispatch_outcomes() {
        let dispatcher = dispatcher();

        let response = dispatcher.dispatch(&event("Create", "ok")).await;
        assert_eq!(response.status(), ResponseStatus::Success);
        assert_eq!(response.data().unwrap()["Mode"], "ok");

        let response = dispatcher.dispatch(&event("Create", "error")).await;
        assert_eq!(response.reason(), Some("creating widget: quota exceeded"));

        let response = dispatcher.dispatch(&event("Create", "panic")).await;
        let reason = response.reason().unwrap();
        assert!(reason.contains("panicked"));
        assert!(reason.contains("widget exploded"));
        assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 3);

        let response = dispatcher.dispatch(&event("Rollback", "ok")).await;
        assert!(response.reason().unwrap().contains("unsupported operation"));
        assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 3);

        let mut missing = event("Update", "ok");
        missing.resource_properties = json!({});
        let response = dispatcher.dispatch(&missing).await;
        assert!(response.reason().unwrap().contains("Mode"));
        assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 3);

        let response = dispatcher.dispatch(&event("Delete", "ok")).await;
        assert!(response.is_success());
        assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 4);
    }

    #[derive(Default)]
    struct BadDecode;

    #[async_trait]
    impl RequestHandler for BadDecode {
        fn decode(&mut self, _properties: &Properties) -> Result<(), DecodeError> {
            panic!("decoder bug")
        }

        async fn create(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
            Ok(HandlerOutcome::empty())
        }

        async fn update(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
            Ok(HandlerOutcome::empty())
        }

        async fn delete(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
            Ok(HandlerOutcome::empty())
        }
    }

    #[tokio::test]
    async fn test_panicking_decode_is_reported() {
        let mut builder = Registry::builder();
        builder.register_default::<BadDecode>("Demo::Bad").unwrap();
        let dispatcher = Dispatcher::new(Arc::new(builder.build()));

        let mut event = event("Create", "ok");
        event.resource_type = "Demo::Bad".into();
        let response = dispatcher.dispatch(&event).await;
        assert!(response.reason().unwrap().contains("decoder bug"));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic payload");
    }
}
