// Request decoder
//
// Resolves the handler for a resource type and populates it from the raw
// ResourceProperties value.

use serde_json::Value;

use crate::error::DecodeError;
use crate::handler::RequestHandler;
use crate::properties::Properties;
use crate::registry::Registry;

/// Build a populated handler for `resource_type` from `raw_properties`
pub fn decode(
    registry: &Registry,
    resource_type: &str,
    raw_properties: &Value,
) -> Result<Box<dyn RequestHandler>, DecodeError> {
    let constructor = registry.lookup(resource_type)?;
    let properties = Properties::from_value(raw_properties)?;

    let mut handler = constructor();
    handler.decode(&properties)?;
    Ok(handler)
}
