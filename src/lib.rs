//! CRUD SDK: schema-driven REST resources behind one generic router.
//!
//! Each resource declares a `ModelSchema` and implements `Resource`; the generic
//! `ResourceService` supplies create/list/get/update/delete over any `Store`, and
//! `build_app` mounts every registered model plus metadata for a generic front-end.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod registry;
pub mod resource;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError, RegistryError, StoreError};
pub use logging::init_tracing;
pub use registry::{register_models, ModelRegistry, RegistrationHook, RegistryEntry};
pub use resource::{Patch, Record, Resource};
pub use response::{Message, Page};
pub use routes::build_app;
pub use service::{PageParams, ResourceOps, ResourceService};
pub use state::AppState;
pub use store::{ensure_schema, MemoryStore, PgStore, Store};
