// Custom::app::HelloWorldResource
//
// Proof-of-concept resource: echoes its Message property back as the
// `Resource` attribute on create. Update and delete only log.

use async_trait::async_trait;
use cfnres_core::{DecodeError, HandlerOutcome, LifecycleEvent, Properties, RequestHandler};
use tracing::info;

pub const RESOURCE_TYPE: &str = "Custom::app::HelloWorldResource";

#[derive(Debug, Default)]
pub struct HelloWorldResource {
    message: String,
}

#[async_trait]
impl RequestHandler for HelloWorldResource {
    fn decode(&mut self, properties: &Properties) -> Result<(), DecodeError> {
        self.message = properties.required_str("Message")?.to_string();
        Ok(())
    }

    async fn create(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
        info!(message = %self.message, "create");
        Ok(HandlerOutcome::empty().attribute(
            "Resource",
            format!("Created message: {}", self.message),
        ))
    }

    async fn update(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
        info!(message = %self.message, "update");
        Ok(HandlerOutcome::empty())
    }

    async fn delete(&self, _event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome> {
        info!(message = %self.message, "delete");
        Ok(HandlerOutcome::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(request_type: &str) -> LifecycleEvent {
        serde_json::from_value(json!({
            "RequestType": request_type,
            "ResponseURL": "https://example.com/response",
            "ResourceType": RESOURCE_TYPE,
            "LogicalResourceId": "HelloWorld",
            "ResourceProperties": { "Message": "Custom resource activated!" }
        }))
        .unwrap()
    }

    fn decoded() -> HelloWorldResource {
        let mut resource = HelloWorldResource::default();
        let properties =
            Properties::from_value(&json!({ "Message": "Custom resource activated!" })).unwrap();
        resource.decode(&properties).unwrap();
        resource
    }

    #[tokio::test]
    async fn test_create_echoes_message() {
        let outcome = decoded().create(&event("Create")).await.unwrap();
        assert_eq!(
            outcome.data["Resource"],
            json!("Created message: Custom resource activated!")
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_return_no_data() {
        let resource = decoded();
        assert!(resource.update(&event("Update")).await.unwrap().data.is_empty());
        assert!(resource.delete(&event("Delete")).await.unwrap().data.is_empty());
    }

    #[test]
    fn test_decode_requires_message() {
        let mut resource = HelloWorldResource::default();
        let err = resource
            .decode(&Properties::from_value(&json!({})).unwrap())
            .unwrap_err();
        assert_eq!(err.field(), Some("Message"));
    }
}
