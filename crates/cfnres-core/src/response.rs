// Response model and the wire document sent back to CloudFormation

use serde::{Deserialize, Serialize};

use crate::event::LifecycleEvent;
use crate::handler::{HandlerOutcome, ResourceData};

/// Upper bound CloudFormation accepts for a whole response document
pub const MAX_RESPONSE_BYTES: usize = 4096;

const TRUNCATION_MARKER: &str = "...";

/// Outcome of one lifecycle invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success {
        data: ResourceData,
        physical_resource_id: Option<String>,
        no_echo: bool,
    },
    Failed {
        reason: String,
    },
}

impl Response {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::Success { .. } => ResponseStatus::Success,
            Self::Failed { .. } => ResponseStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&ResourceData> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            Self::Success { .. } => None,
        }
    }
}

impl From<HandlerOutcome> for Response {
    fn from(outcome: HandlerOutcome) -> Self {
        Self::Success {
            data: outcome.data,
            physical_resource_id: outcome.physical_resource_id,
            no_echo: outcome.no_echo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body PUT to the event's ResponseURL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseDocument {
    pub status: ResponseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_echo: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResourceData>,
}

impl ResponseDocument {
    /// Correlate a response with the event it answers.
    ///
    /// PhysicalResourceId resolution: handler-provided id, then the id already
    /// on the event (Update/Delete), then `fallback_physical_id`, then
    /// `<LogicalResourceId>-<uuid>`.
    pub fn build(
        event: &LifecycleEvent,
        response: Response,
        fallback_physical_id: Option<&str>,
        max_reason_bytes: usize,
    ) -> Self {
        let (status, reason, data, no_echo, handler_physical_id) = match response {
            Response::Success {
                data,
                physical_resource_id,
                no_echo,
            } => (
                ResponseStatus::Success,
                None,
                Some(data),
                no_echo,
                physical_resource_id,
            ),
            Response::Failed { reason } => (
                ResponseStatus::Failed,
                Some(truncate_reason(&reason, max_reason_bytes)),
                None,
                false,
                None,
            ),
        };

        let physical_resource_id = handler_physical_id
            .or_else(|| event.physical_resource_id.clone())
            .or_else(|| fallback_physical_id.map(str::to_string))
            .unwrap_or_else(|| generated_physical_id(&event.logical_resource_id));

        Self {
            status,
            reason,
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo,
            data,
        }
    }
}

fn generated_physical_id(logical_resource_id: &str) -> String {
    let suffix = uuid::Uuid::new_v4();
    if logical_resource_id.is_empty() {
        suffix.to_string()
    } else {
        format!("{}-{}", logical_resource_id, suffix)
    }
}

/// Cut `reason` to at most `max_bytes` bytes on a char boundary
pub fn truncate_reason(reason: &str, max_bytes: usize) -> String {
    if reason.len() <= max_bytes {
        return reason.to_string();
    }
    if max_bytes <= TRUNCATION_MARKER.len() {
        return TRUNCATION_MARKER[..max_bytes].to_string();
    }

    let mut cut = max_bytes - TRUNCATION_MARKER.len();
    while !reason.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &reason[..cut], TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(physical_resource_id: Option<&str>) -> LifecycleEvent {
        serde_json::from_value(json!({
            "RequestType": "Update",
            "ResponseURL": "https://example.com/response",
            "StackId": "stack-1",
            "RequestId": "req-1",
            "ResourceType": "Demo::Echo",
            "LogicalResourceId": "Echo",
            "PhysicalResourceId": physical_resource_id,
            "ResourceProperties": {}
        }))
        .unwrap()
    }

    #[test]
    fn test_success_document_shape() {
        let mut data = ResourceData::new();
        data.insert("Resource".into(), json!("Created message: hi"));
        let response = Response::Success {
            data,
            physical_resource_id: Some("echo-1".into()),
            no_echo: false,
        };

        let doc = ResponseDocument::build(&event(None), response, None, 1024);
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            wire,
            json!({
                "Status": "SUCCESS",
                "PhysicalResourceId": "echo-1",
                "StackId": "stack-1",
                "RequestId": "req-1",
                "LogicalResourceId": "Echo",
                "Data": { "Resource": "Created message: hi" }
            })
        );
    }

    #[test]
    fn test_empty_success_still_sends_data() {
        let response = Response::from(HandlerOutcome::empty());
        let doc = ResponseDocument::build(&event(Some("phys-1")), response, None, 1024);
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(wire["Data"], json!({}));
        assert_eq!(wire["PhysicalResourceId"], "phys-1");
    }

    #[test]
    fn test_failed_document_shape() {
        let doc = ResponseDocument::build(
            &event(None),
            Response::failed("missing required property 'Message'"),
            Some("2026/10/18/[$LATEST]abcdef"),
            1024,
        );
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(wire["Status"], "FAILED");
        assert_eq!(wire["Reason"], "missing required property 'Message'");
        assert_eq!(wire["PhysicalResourceId"], "2026/10/18/[$LATEST]abcdef");
        assert!(wire.get("Data").is_none());
        assert!(wire.get("NoEcho").is_none());
    }

    #[test]
    fn test_physical_id_resolution_order() {
        let from_handler = Response::from(HandlerOutcome::empty().physical_resource_id("handler"));
        let doc = ResponseDocument::build(&event(Some("event")), from_handler, Some("stream"), 64);
        assert_eq!(doc.physical_resource_id, "handler");

        let plain = Response::from(HandlerOutcome::empty());
        let doc = ResponseDocument::build(&event(Some("event")), plain.clone(), Some("stream"), 64);
        assert_eq!(doc.physical_resource_id, "event");

        let doc = ResponseDocument::build(&event(None), plain.clone(), Some("stream"), 64);
        assert_eq!(doc.physical_resource_id, "stream");

        let doc = ResponseDocument::build(&event(None), plain, None, 64);
        assert!(doc.physical_resource_id.starts_with("Echo-"));
        assert_eq!(doc.physical_resource_id.len(), "Echo-".len() + 36);
    }

    #[test]
    fn test_no_echo_is_serialized_when_set() {
        let response =
            Response::from(HandlerOutcome::empty().attribute("Secret", "s3cr3t").no_echo());
        let doc = ResponseDocument::build(&event(Some("p")), response, None, 64);
        let wire = serde_json::to_value(&doc).unwrap();
        assert_eq!(wire["NoEcho"], true);
    }

    #[test]
    fn test_truncate_reason() {
        assert_eq!(truncate_reason("short", 10), "short");
        assert_eq!(truncate_reason("abcdefghij", 8), "abcde...");
        assert_eq!(truncate_reason("abcdef", 2), "..");

        // "é" is two bytes; the cut must not split it
        let truncated = truncate_reason("aéééé", 7);
        assert_eq!(truncated, "aé...");
        assert!(truncated.len() <= 7);
    }
}
