//! Unit catalog.
//!
//! Contains the built-in schemas, validations and transformations, and a
//! registry of named schemas.

pub mod builtin;
pub mod registry;

pub use builtin::*;
pub use registry::{RegistryEntry, SchemaFactory, SchemaRegistry};
