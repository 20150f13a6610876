//! Router factory core: generic CRUD, request validation, metadata generation.

mod crud;
pub mod metadata;
mod validation;

pub use crud::{ResourceOps, ResourceService};
pub use metadata::{describe_fields, enum_options, EnumOption, FieldMetadata, ModelMetadata};
pub use validation::{PageParams, RequestValidator, DEFAULT_LIMIT, MAX_LIMIT};
