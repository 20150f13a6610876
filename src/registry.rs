//! Model registry: resource name -> schema, storage-backed operations, title.
//!
//! Populated during startup, then sealed and shared read-only behind `Arc`.

use crate::case::to_display_name;
use crate::error::RegistryError;
use crate::resource::Resource;
use crate::service::{enum_options, EnumOption, ModelMetadata, ResourceOps, ResourceService};
use crate::store::Store;
use std::collections::HashMap;
use std::sync::Arc;

/// Names taken by the metadata routes under `/api`; never served as models.
pub const RESERVED_NAMES: &[&str] = &["metadata", "enums"];

/// Registration hook exposed by a resource module.
pub type RegistrationHook = fn(&mut ModelRegistry) -> Result<(), RegistryError>;

pub struct RegistryEntry {
    pub name: String,
    pub title: String,
    pub ops: Arc<dyn ResourceOps>,
}

impl RegistryEntry {
    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            name: self.name.clone(),
            display_name: self.title.clone(),
            icon: self.ops.icon(),
            fields: self.ops.field_metadata(),
        }
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("kind", &self.ops.kind())
            .finish()
    }
}

#[derive(Default, Debug)]
pub struct ModelRegistry {
    entries: Vec<Arc<RegistryEntry>>,
    index: HashMap<String, usize>,
    sealed: bool,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) `name`. A replaced entry keeps its original position.
    /// Title defaults to the name title-cased ("users" -> "Users").
    pub fn register(
        &mut self,
        name: &str,
        ops: Arc<dyn ResourceOps>,
        title: Option<&str>,
    ) -> Result<(), RegistryError> {
        if self.sealed {
            tracing::warn!(model = name, "registration after seal rejected");
            return Err(RegistryError::Sealed(name.to_string()));
        }
        let entry = Arc::new(RegistryEntry {
            name: name.to_string(),
            title: title.map(str::to_string).unwrap_or_else(|| to_display_name(name)),
            ops,
        });
        match self.index.get(name) {
            Some(&i) => {
                tracing::warn!(model = name, "model re-registered; last registration wins");
                self.entries[i] = entry;
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
        tracing::info!(model = name, kind = self.entries[self.index[name]].ops.kind(), "model registered");
        Ok(())
    }

    /// Register a typed resource over `store`, wrapped in the generic service.
    pub fn register_resource<R: Resource, S: Store<R>>(
        &mut self,
        name: &str,
        store: S,
        title: Option<&str>,
    ) -> Result<(), RegistryError> {
        self.register(name, Arc::new(ResourceService::<R, S>::new(store)), title)
    }

    pub fn get(&self, name: &str) -> Result<&Arc<RegistryEntry>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<RegistryEntry>> {
        self.entries.iter()
    }

    /// Close registration. Startup calls this once before serving.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn metadata(&self) -> Vec<ModelMetadata> {
        self.entries.iter().map(|e| e.metadata()).collect()
    }

    /// Options of the enumeration called `enum_name`, searched across all registered schemas.
    pub fn enum_options(&self, enum_name: &str) -> Option<Vec<EnumOption>> {
        self.entries
            .iter()
            .flat_map(|e| e.ops.schema().enum_fields().into_values())
            .find(|spec| spec.name == enum_name)
            .map(enum_options)
    }
}

/// Run each module's registration hook in order; stops at the first failure.
pub fn register_models(registry: &mut ModelRegistry, hooks: &[RegistrationHook]) -> Result<(), RegistryError> {
    for hook in hooks {
        hook(registry)?;
    }
    Ok(())
}
