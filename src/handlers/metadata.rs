//! Metadata and enumeration lookups for a generic front-end.

use crate::error::AppError;
use crate::service::{EnumOption, ModelMetadata};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct MetadataBody {
    pub models: Vec<ModelMetadata>,
}

pub async fn models_metadata(State(state): State<AppState>) -> Json<MetadataBody> {
    Json(MetadataBody {
        models: state.registry.metadata(),
    })
}

pub async fn enum_values(
    State(state): State<AppState>,
    Path(enum_name): Path<String>,
) -> Result<Json<Vec<EnumOption>>, AppError> {
    state
        .registry
        .enum_options(&enum_name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Enum '{}' not found", enum_name)))
}
