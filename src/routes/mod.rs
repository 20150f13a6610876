//! Route builders and the assembled application.

pub mod common;
pub mod resource;

pub use common::common_routes;
pub use resource::{dynamic_routes, metadata_routes, registered_routes, resource_routes};

use crate::error::panic_response;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer};

/// Every route: common, metadata, fixed-prefix per model, then the dynamic fallback.
pub fn build_app(state: AppState) -> Router {
    let limit = state.settings.max_body_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(metadata_routes(state.clone()))
        .merge(registered_routes(&state))
        .merge(dynamic_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(RequestBodyLimitLayer::new(limit))
                .layer(DefaultBodyLimit::max(limit)),
        )
}
