//! The trait every custom resource type implements

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::event::LifecycleEvent;
use crate::properties::Properties;

/// Attribute data returned to CloudFormation, readable with `Fn::GetAtt`
pub type ResourceData = Map<String, Value>;

/// A custom resource implementation.
///
/// The registry constructs a fresh, empty instance for every event, then
/// calls [`decode`](RequestHandler::decode) with the event's
/// `ResourceProperties` before exactly one of the lifecycle methods runs.
///
/// CloudFormation delivers events at least once. `update` and `delete` must be
/// safe to run repeatedly for the same resource; the runtime does not
/// deduplicate. `delete` is also sent after a failed `create`, with whatever
/// physical id the failed response carried.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Populate typed fields from the property bag
    fn decode(&mut self, properties: &Properties) -> Result<(), DecodeError>;

    async fn create(&self, event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome>;

    async fn update(&self, event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome>;

    async fn delete(&self, event: &LifecycleEvent) -> anyhow::Result<HandlerOutcome>;
}

/// Successful result of a lifecycle method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerOutcome {
    pub data: ResourceData,
    pub physical_resource_id: Option<String>,
    pub no_echo: bool,
}

impl HandlerOutcome {
    /// Success with no attribute data
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_data(data: ResourceData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Add one attribute
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn physical_resource_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    /// Mask the returned data in CloudFormation console output
    pub fn no_echo(mut self) -> Self {
        self.no_echo = true;
        self
    }
}

impl From<ResourceData> for HandlerOutcome {
    fn from(data: ResourceData) -> Self {
        Self::with_data(data)
    }
}
