// CloudFormation custom-resource request document
//
// RequestType is kept as a raw string so that unknown verbs still reach the
// dispatcher and can be answered with FAILED instead of being dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::DispatchError;

/// Inbound lifecycle event sent by CloudFormation for one stack operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: String,

    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    #[serde(default)]
    pub stack_id: String,

    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub resource_type: String,

    #[serde(default)]
    pub logical_resource_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    #[serde(default = "empty_properties")]
    pub resource_properties: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_token: Option<String>,
}

fn empty_properties() -> Value {
    Value::Object(Default::default())
}

impl LifecycleEvent {
    /// Parse the raw `RequestType` into a lifecycle verb
    pub fn verb(&self) -> Result<LifecycleVerb, DispatchError> {
        self.request_type.parse()
    }

    /// Recover the fields needed to answer a payload that failed to parse.
    ///
    /// Returns `None` when there is no usable `ResponseURL`. Fields with the
    /// wrong JSON type are left empty; properties are dropped.
    pub fn salvage(payload: &Value) -> Option<Self> {
        let text = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);

        let response_url = text("ResponseURL").filter(|url| !url.trim().is_empty())?;

        Some(Self {
            request_type: text("RequestType").unwrap_or_default(),
            response_url,
            stack_id: text("StackId").unwrap_or_default(),
            request_id: text("RequestId").unwrap_or_default(),
            resource_type: text("ResourceType").unwrap_or_default(),
            logical_resource_id: text("LogicalResourceId").unwrap_or_default(),
            physical_resource_id: text("PhysicalResourceId"),
            resource_properties: empty_properties(),
            old_resource_properties: None,
            service_token: text("ServiceToken"),
        })
    }
}

/// The three operations CloudFormation may request against a custom resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleVerb {
    Create,
    Update,
    Delete,
}

impl LifecycleVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleVerb::Create => "Create",
            LifecycleVerb::Update => "Update",
            LifecycleVerb::Delete => "Delete",
        }
    }
}

impl fmt::Display for LifecycleVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleVerb {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Create" => Ok(LifecycleVerb::Create),
            "Update" => Ok(LifecycleVerb::Update),
            "Delete" => Ok(LifecycleVerb::Delete),
            other => Err(DispatchError::UnsupportedOperation {
                verb: other.to_string(),
            }),
        }
    }
}
