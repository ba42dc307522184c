// Typed access to the ResourceProperties value tree
//
// CloudFormation stringifies every scalar it passes to a custom resource, so
// numbers and booleans usually arrive as "42" and "true". The parsed accessors
// accept both the native JSON scalar and its string form.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::DecodeError;

/// Key/value bag decoded from an event's `ResourceProperties`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: Map<String, Value>,
}

impl Properties {
    /// Wrap a raw value. `null` is treated as an empty bag.
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self {
                values: map.clone(),
            }),
            Value::Null => Ok(Self::default()),
            other => Err(DecodeError::NotAnObject {
                found: type_name(other),
            }),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field).filter(|value| !value.is_null())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn required_str(&self, field: &str) -> Result<&str, DecodeError> {
        let value = self.required(field)?;
        value.as_str().ok_or_else(|| DecodeError::TypeMismatch {
            field: field.to_string(),
            expected: "string",
            found: type_name(value),
        })
    }

    pub fn optional_str(&self, field: &str) -> Result<Option<&str>, DecodeError> {
        match self.get(field) {
            Some(_) => self.required_str(field).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a scalar property through `FromStr`
    pub fn required_parsed<T>(&self, field: &str) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.required(field)?;
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(DecodeError::TypeMismatch {
                    field: field.to_string(),
                    expected: "scalar",
                    found: type_name(other),
                });
            }
        };
        text.trim()
            .parse::<T>()
            .map_err(|e| DecodeError::InvalidValue {
                field: field.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn optional_parsed<T>(&self, field: &str) -> Result<Option<T>, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(field) {
            Some(_) => self.required_parsed(field).map(Some),
            None => Ok(None),
        }
    }

    /// Boolean property; accepts `true`/`false` in any case, native or stringified
    pub fn required_bool(&self, field: &str) -> Result<bool, DecodeError> {
        let value = self.required(field)?;
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(DecodeError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("expected true or false, got '{}'", s),
                }),
            },
            other => Err(DecodeError::TypeMismatch {
                field: field.to_string(),
                expected: "boolean",
                found: type_name(other),
            }),
        }
    }

    /// Deserialize a nested property (list or object) into a typed value
    pub fn required_as<T: DeserializeOwned>(&self, field: &str) -> Result<T, DecodeError> {
        let value = self.required(field)?;
        serde_json::from_value(value.clone()).map_err(|e| DecodeError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        })
    }

    fn required(&self, field: &str) -> Result<&Value, DecodeError> {
        self.get(field).ok_or_else(|| DecodeError::MissingField {
            field: field.to_string(),
        })
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        Properties::from_value(&value).unwrap()
    }

    #[test]
    fn test_required_str() {
        let p = props(json!({ "Message": "hi", "Count": 3 }));
        assert_eq!(p.required_str("Message").unwrap(), "hi");

        let err = p.required_str("Missing").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                field: "Missing".into()
            }
        );

        let err = p.required_str("Count").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TypeMismatch {
                ref field,
                expected: "string",
                found: "number",
            } if field == "Count"
        ));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let p = props(json!({ "Message": null }));
        assert!(!p.contains("Message"));
        assert_eq!(p.optional_str("Message").unwrap(), None);
        assert!(matches!(
            p.required_str("Message"),
            Err(DecodeError::MissingField { .. })
        ));
    }

    #[test]
    fn test_parsed_accepts_stringified_scalars() {
        let p = props(json!({ "Port": "8080", "Retries": 3, "Ratio": " 0.5 " }));
        assert_eq!(p.required_parsed::<u16>("Port").unwrap(), 8080);
        assert_eq!(p.required_parsed::<u32>("Retries").unwrap(), 3);
        assert_eq!(p.required_parsed::<f64>("Ratio").unwrap(), 0.5);
        assert_eq!(p.optional_parsed::<u16>("Absent").unwrap(), None);

        let err = props(json!({ "Port": "eighty" }))
            .required_parsed::<u16>("Port")
            .unwrap_err();
        assert_eq!(err.field(), Some("Port"));
    }

    #[test]
    fn test_required_bool() {
        let p = props(json!({ "A": true, "B": "False", "C": "yes", "D": 1 }));
        assert!(p.required_bool("A").unwrap());
        assert!(!p.required_bool("B").unwrap());
        assert!(matches!(
            p.required_bool("C"),
            Err(DecodeError::InvalidValue { .. })
        ));
        assert!(matches!(
            p.required_bool("D"),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_required_as_nested() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Tag {
            #[serde(rename = "Key")]
            key: String,
            #[serde(rename = "Value")]
            value: String,
        }

        let p = props(json!({ "Tags": [{ "Key": "env", "Value": "dev" }] }));
        let tags: Vec<Tag> = p.required_as("Tags").unwrap();
        assert_eq!(
            tags,
            vec![Tag {
                key: "env".into(),
                value: "dev".into()
            }]
        );

        let err = p.required_as::<Vec<u32>>("Tags").unwrap_err();
        assert_eq!(err.field(), Some("Tags"));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert_eq!(
            Properties::from_value(&json!(["a"])).unwrap_err(),
            DecodeError::NotAnObject { found: "array" }
        );
        assert!(Properties::from_value(&Value::Null)
            .unwrap()
            .as_map()
            .is_empty());
    }
}
