//! Custom-resource dispatch runtime for CloudFormation
//!
//! This crate provides the resource type registry, the request decoder, the
//! lifecycle dispatcher and the response emitter used by the Lambda backend.
//! It has no knowledge of the hosting platform; transports plug in through
//! [`ResponseEmitter`].

pub mod decoder;
pub mod dispatcher;
pub mod emitter;
pub mod error;
pub mod event;
pub mod handler;
pub mod properties;
pub mod provider;
pub mod registry;
pub mod response;

pub use decoder::decode;
pub use dispatcher::Dispatcher;
pub use emitter::{OnceEmitter, ResponseEmitter};
pub use error::{DecodeError, DispatchError, EmitError, RegistryError};
pub use event::{LifecycleEvent, LifecycleVerb};
pub use handler::{HandlerOutcome, RequestHandler, ResourceData};
pub use properties::Properties;
pub use provider::{CustomResourceProvider, ResponseOptions};
pub use registry::{Constructor, Registry, RegistryBuilder};
pub use response::{Response, ResponseDocument, ResponseStatus};
