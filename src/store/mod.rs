//! Storage collaborators: one keyed store per resource type.
//!
//! Stores never validate. They persist what the service hands them and report
//! missing ids as `None` / `false` rather than errors.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_schema, PgStore};

use crate::error::StoreError;
use crate::resource::Resource;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Store<R: Resource>: Send + Sync + 'static {
    /// Persist `entity` under its id. An existing entity with the same id is replaced.
    async fn create(&self, entity: R) -> Result<R, StoreError>;

    /// Newest `created_at` first; returns the page and the total before slicing.
    async fn list(&self, offset: usize, limit: usize) -> Result<(Vec<R>, usize), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError>;

    /// Merge `patch` onto the stored entity and stamp `updated_at`. `None` if absent.
    async fn update(&self, id: &str, patch: R::Patch) -> Result<Option<R>, StoreError>;

    /// `true` if an entity existed and was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl<R: Resource, S: Store<R> + ?Sized> Store<R> for Arc<S> {
    async fn create(&self, entity: R) -> Result<R, StoreError> {
        (**self).create(entity).await
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<(Vec<R>, usize), StoreError> {
        (**self).list(offset, limit).await
    }

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        (**self).get(id).await
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<Option<R>, StoreError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}

/// Newest first; equal timestamps fall back to id, which is time-ordered too.
pub(crate) fn newest_first<R: Resource>(a: &R, b: &R) -> std::cmp::Ordering {
    b.record()
        .created_at
        .cmp(&a.record().created_at)
        .then_with(|| b.id().cmp(a.id()))
}
