// Custom resource types served by this function

use cfnres_core::{Registry, RegistryError};

pub mod hello_world;

pub use hello_world::HelloWorldResource;

/// Build the registry of every resource type this backend handles
pub fn registry() -> Result<Registry, RegistryError> {
    let mut builder = Registry::builder();
    builder.register_default::<HelloWorldResource>(hello_world::RESOURCE_TYPE)?;
    Ok(builder.build())
}
