//! HTTP handlers for resource CRUD, metadata, and enumerations.

pub mod metadata;
pub mod resource;
pub use metadata::*;
pub use resource::*;
