//! Resource CRUD handlers.
//!
//! Two entry points per operation: fixed-prefix routes carry their registry entry as
//! state, dynamic routes resolve `/api/:model_name` through the registry first.

use crate::error::AppError;
use crate::extractors::Payload;
use crate::registry::{RegistryEntry, RESERVED_NAMES};
use crate::response::Page;
use crate::service::{RequestValidator, ResourceOps};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type Params = HashMap<String, String>;

async fn create(ops: &dyn ResourceOps, Payload(body): Payload) -> Result<Json<Value>, AppError> {
    Ok(Json(ops.create(body).await?))
}

async fn list(ops: &dyn ResourceOps, params: &Params) -> Result<Json<Page<Value>>, AppError> {
    let page = RequestValidator::page(params)?;
    Ok(Json(ops.list(page).await?))
}

async fn read(ops: &dyn ResourceOps, id: &str) -> Result<Json<Value>, AppError> {
    Ok(Json(ops.get(id).await?))
}

async fn update(ops: &dyn ResourceOps, id: &str, Payload(body): Payload) -> Result<Json<Value>, AppError> {
    Ok(Json(ops.update(id, body).await?))
}

async fn delete(ops: &dyn ResourceOps, id: &str) -> Result<Json<Value>, AppError> {
    Ok(Json(ops.delete(id).await?))
}

// Fixed prefix: /api/users, /api/employees, ...

pub async fn create_item(
    State(entry): State<Arc<RegistryEntry>>,
    payload: Payload,
) -> Result<Json<Value>, AppError> {
    create(entry.ops.as_ref(), payload).await
}

pub async fn list_items(
    State(entry): State<Arc<RegistryEntry>>,
    Query(params): Query<Params>,
) -> Result<Json<Page<Value>>, AppError> {
    list(entry.ops.as_ref(), &params).await
}

pub async fn read_item(
    State(entry): State<Arc<RegistryEntry>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    read(entry.ops.as_ref(), &id).await
}

pub async fn update_item(
    State(entry): State<Arc<RegistryEntry>>,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<Value>, AppError> {
    update(entry.ops.as_ref(), &id, payload).await
}

pub async fn delete_item(
    State(entry): State<Arc<RegistryEntry>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    delete(entry.ops.as_ref(), &id).await
}

// Dynamic: /api/:model_name

fn lookup<'a>(state: &'a AppState, model_name: &str) -> Result<&'a Arc<RegistryEntry>, AppError> {
    if RESERVED_NAMES.contains(&model_name) {
        return Err(AppError::NotFound(format!(
            "'/api/{}' is reserved and not a model",
            model_name
        )));
    }
    state.registry.get(model_name).map_err(|e| {
        tracing::debug!(model = model_name, "unknown model requested");
        AppError::from(e)
    })
}

pub async fn create_model_item(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
    payload: Payload,
) -> Result<Json<Value>, AppError> {
    create(lookup(&state, &model_name)?.ops.as_ref(), payload).await
}

pub async fn list_model_items(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<Page<Value>>, AppError> {
    list(lookup(&state, &model_name)?.ops.as_ref(), &params).await
}

pub async fn read_model_item(
    State(state): State<AppState>,
    Path((model_name, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    read(lookup(&state, &model_name)?.ops.as_ref(), &id).await
}

pub async fn update_model_item(
    State(state): State<AppState>,
    Path((model_name, id)): Path<(String, String)>,
    payload: Payload,
) -> Result<Json<Value>, AppError> {
    update(lookup(&state, &model_name)?.ops.as_ref(), &id, payload).await
}

pub async fn delete_model_item(
    State(state): State<AppState>,
    Path((model_name, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    delete(lookup(&state, &model_name)?.ops.as_ref(), &id).await
}
