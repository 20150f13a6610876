//! Common routes: health, version, info.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct VersionBody {
    name: &'static str,
    version: &'static str,
    title: String,
    description: String,
    app_version: String,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn version(State(state): State<AppState>) -> Json<VersionBody> {
    let settings = &state.settings;
    Json(VersionBody {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        title: settings.app_title.clone(),
        description: settings.app_description.clone(),
        app_version: settings.app_version.clone(),
    })
}

/// GET /health, GET /version, GET /info.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/info", get(version))
        .with_state(state)
}
