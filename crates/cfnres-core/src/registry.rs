// Resource type registry
//
// Built once at startup through RegistryBuilder, then frozen. The frozen
// Registry has no mutating methods and is shared across concurrent
// dispatches behind an Arc.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DecodeError, RegistryError};
use crate::handler::RequestHandler;

/// Zero-argument factory producing an empty handler
pub type Constructor = Arc<dyn Fn() -> Box<dyn RequestHandler> + Send + Sync>;

/// Collects registrations before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    constructors: HashMap<String, Constructor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `resource_type`.
    ///
    /// A second registration of the same type is rejected rather than
    /// overwriting the first one.
    pub fn register<F>(
        &mut self,
        resource_type: impl Into<String>,
        constructor: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn() -> Box<dyn RequestHandler> + Send + Sync + 'static,
    {
        let resource_type = resource_type.into();
        if resource_type.trim().is_empty() {
            return Err(RegistryError::EmptyTypeId);
        }
        if self.constructors.contains_key(&resource_type) {
            return Err(RegistryError::Duplicate { resource_type });
        }

        tracing::debug!(resource_type = %resource_type, "Registered custom resource type");
        self.constructors.insert(resource_type, Arc::new(constructor));
        Ok(self)
    }

    /// Register a handler type that starts out as its `Default` value
    pub fn register_default<H>(
        &mut self,
        resource_type: impl Into<String>,
    ) -> Result<&mut Self, RegistryError>
    where
        H: RequestHandler + Default + 'static,
    {
        self.register(resource_type, || Box::new(H::default()) as Box<dyn RequestHandler>)
    }

    pub fn build(self) -> Registry {
        Registry {
            constructors: self.constructors,
        }
    }
}

/// Read-only mapping from resource type to handler constructor
pub struct Registry {
    constructors: HashMap<String, Constructor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Exact-match lookup
    pub fn lookup(&self, resource_type: &str) -> Result<&Constructor, DecodeError> {
        self.constructors
            .get(resource_type)
            .ok_or_else(|| DecodeError::NotFound {
                resource_type: resource_type.to_string(),
            })
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.constructors.contains_key(resource_type)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered type identifiers, sorted
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}
