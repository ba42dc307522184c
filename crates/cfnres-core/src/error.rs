//! Error types for the custom-resource runtime

use thiserror::Error;

/// Errors raised while building a [`Registry`](crate::Registry)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("resource type '{resource_type}' is already registered")]
    Duplicate { resource_type: String },

    #[error("resource type identifier must not be empty")]
    EmptyTypeId,
}

/// Errors raised while turning `ResourceProperties` into a typed handler.
///
/// Decode errors are permanent: the dispatcher never invokes a handler method
/// after one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("resource type '{resource_type}' is not registered (not found)")]
    NotFound { resource_type: String },

    #[error("missing required property '{field}'")]
    MissingField { field: String },

    #[error("property '{field}' has the wrong type: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("property '{field}' is invalid: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("ResourceProperties must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

impl DecodeError {
    /// Field the error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::TypeMismatch { field, .. }
            | Self::InvalidValue { field, .. } => Some(field),
            Self::NotFound { .. } | Self::NotAnObject { .. } => None,
        }
    }
}

/// Everything that can turn a lifecycle event into a FAILED response
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("unsupported operation: RequestType '{verb}' is not one of Create, Update, Delete")]
    UnsupportedOperation { verb: String },

    #[error("{message}")]
    HandlerFailure { verb: &'static str, message: String },

    #[error("{verb} handler panicked: {message}")]
    HandlerPanicked { verb: &'static str, message: String },
}

impl DispatchError {
    /// Short classification used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "DecodeError",
            Self::UnsupportedOperation { .. } => "UnsupportedOperation",
            Self::HandlerFailure { .. } => "HandlerFailure",
            Self::HandlerPanicked { .. } => "HandlerPanicked",
        }
    }
}

/// Delivery of a response document failed. Terminal for the invocation.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("a response has already been sent for this invocation")]
    AlreadySent,

    #[error("failed to serialize response document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to deliver response to {destination}: {reason}")]
    Transport { destination: String, reason: String },

    #[error("response destination rejected the document with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
