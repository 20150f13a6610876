//! In-process store: one map per resource type.

use super::{newest_first, Store};
use crate::error::StoreError;
use crate::resource::Resource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct MemoryStore<R> {
    data: RwLock<HashMap<String, R>>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        MemoryStore {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.data.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl<R: Resource> Store<R> for MemoryStore<R> {
    async fn create(&self, entity: R) -> Result<R, StoreError> {
        if entity.id().is_empty() {
            return Err(StoreError::MissingId);
        }
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        if data.insert(entity.id().to_string(), entity.clone()).is_some() {
            tracing::warn!(kind = R::KIND, id = %entity.id(), "create replaced an existing entity");
        }
        Ok(entity)
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<(Vec<R>, usize), StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        let mut items: Vec<&R> = data.values().collect();
        items.sort_by(|a, b| newest_first(*a, *b));
        let total = items.len();
        let page = items.into_iter().skip(offset).take(limit).cloned().collect();
        Ok((page, total))
    }

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<Option<R>, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        let Some(current) = data.get_mut(id) else {
            return Ok(None);
        };
        current.apply(patch);
        current.record_mut().touch();
        Ok(Some(current.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        Ok(data.remove(id).is_some())
    }
}
