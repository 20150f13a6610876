//! Resource routes: one fixed-prefix router per registered model, plus the dynamic
//! `/api/:model_name` router and the metadata endpoints.

use crate::handlers::{
    create_item, create_model_item, delete_item, delete_model_item, enum_values, list_items,
    list_model_items, models_metadata, read_item, read_model_item, update_item, update_model_item,
};
use crate::registry::{RegistryEntry, RESERVED_NAMES};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// CRUD under `prefix` for one entry: the collection path with and without a trailing
/// slash, and `prefix/:id`.
pub fn resource_routes(entry: Arc<RegistryEntry>, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/');
    Router::new()
        .route(prefix, post(create_item).get(list_items))
        .route(&format!("{}/", prefix), post(create_item).get(list_items))
        .route(
            &format!("{}/:id", prefix),
            get(read_item).patch(update_item).delete(delete_item),
        )
        .with_state(entry)
}

/// Fixed-prefix routes (`/api/{name}`) for every registered model.
pub fn registered_routes(state: &AppState) -> Router {
    state.registry.entries().fold(Router::new(), |router, entry| {
        if RESERVED_NAMES.contains(&entry.name.as_str()) {
            tracing::warn!(model = %entry.name, "model name is reserved; only reachable through metadata");
            return router;
        }
        router.merge(resource_routes(entry.clone(), &format!("/api/{}", entry.name)))
    })
}

/// `/api/:model_name` routes resolved through the registry at request time.
pub fn dynamic_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/:model_name", post(create_model_item).get(list_model_items))
        .route("/api/:model_name/", post(create_model_item).get(list_model_items))
        .route(
            "/api/:model_name/:id",
            get(read_model_item).patch(update_model_item).delete(delete_model_item),
        )
        .with_state(state)
}

/// GET /api/metadata, GET /api/enums/:enum_name.
pub fn metadata_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/metadata", get(models_metadata))
        .route("/api/enums/:enum_name", get(enum_values))
        .with_state(state)
}
