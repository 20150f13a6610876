//! Generic CRUD over any `Resource` + `Store` pair.
//!
//! `ResourceService` is the typed core; its `ResourceOps` impl is the
//! JSON-in/JSON-out face the registry and HTTP handlers work with.

use crate::error::AppError;
use crate::resource::{now, Patch, Record, Resource};
use crate::response::{Message, Page};
use crate::schema::ModelSchema;
use crate::service::metadata::{describe_fields, FieldMetadata};
use crate::service::validation::{PageParams, RequestValidator};
use crate::store::Store;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Uniform, type-erased operations of one registered resource.
#[async_trait]
pub trait ResourceOps: Send + Sync {
    /// Singular type name ("User").
    fn kind(&self) -> &'static str;

    fn icon(&self) -> &'static str;

    fn schema(&self) -> &'static ModelSchema;

    fn field_metadata(&self) -> Vec<FieldMetadata> {
        let schema = self.schema();
        describe_fields(schema.response_view(), &schema.required_fields(), &schema.enum_fields())
    }

    async fn create(&self, body: Map<String, Value>) -> Result<Value, AppError>;

    async fn list(&self, page: PageParams) -> Result<Page<Value>, AppError>;

    async fn get(&self, id: &str) -> Result<Value, AppError>;

    async fn update(&self, id: &str, body: Map<String, Value>) -> Result<Value, AppError>;

    async fn delete(&self, id: &str) -> Result<Value, AppError>;
}

pub struct ResourceService<R, S> {
    store: S,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: Store<R>> ResourceService<R, S> {
    pub fn new(store: S) -> Self {
        ResourceService {
            store,
            _resource: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("{} '{}' not found", R::KIND, id))
    }

    /// Assign id and timestamps, then persist.
    pub async fn create_typed(&self, input: R::Create) -> Result<R, AppError> {
        let entity = R::build(Record::new_at(now()), input);
        tracing::debug!(kind = R::KIND, id = %entity.id(), "create");
        Ok(self.store.create(entity).await?)
    }

    pub async fn list_typed(&self, page: PageParams) -> Result<Page<R>, AppError> {
        let (items, total) = self.store.list(page.offset, page.limit).await?;
        Ok(Page {
            items,
            total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    pub async fn get_typed(&self, id: &str) -> Result<R, AppError> {
        self.store.get(id).await?.ok_or_else(|| Self::not_found(id))
    }

    /// Rejects an empty patch before touching the store.
    pub async fn update_typed(&self, id: &str, patch: R::Patch) -> Result<R, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest("No fields to update".into()));
        }
        tracing::debug!(kind = R::KIND, id, "update");
        self.store.update(id, patch).await?.ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete_typed(&self, id: &str) -> Result<(), AppError> {
        tracing::debug!(kind = R::KIND, id, "delete");
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }
}

/// Deserialize validated input into a typed contract. Validation already ran, so a
/// failure here means the schema and the struct disagree.
fn typed<T: serde::de::DeserializeOwned>(kind: &str, map: Map<String, Value>) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AppError::Internal(format!("{} schema does not match its contract: {}", kind, e)))
}

fn to_json<T: Serialize>(v: &T) -> Result<Value, AppError> {
    serde_json::to_value(v).map_err(|e| AppError::Internal(format!("serialize response: {}", e)))
}

#[async_trait]
impl<R: Resource, S: Store<R>> ResourceOps for ResourceService<R, S> {
    fn kind(&self) -> &'static str {
        R::KIND
    }

    fn icon(&self) -> &'static str {
        R::ICON
    }

    fn schema(&self) -> &'static ModelSchema {
        R::schema()
    }

    async fn create(&self, body: Map<String, Value>) -> Result<Value, AppError> {
        let valid = RequestValidator::validate(R::schema(), &body)?;
        let input: R::Create = typed(R::KIND, valid)?;
        let created = self.create_typed(input).await?;
        to_json(&created)
    }

    async fn list(&self, page: PageParams) -> Result<Page<Value>, AppError> {
        self.list_typed(page).await?.map(|item| to_json(&item))
    }

    async fn get(&self, id: &str) -> Result<Value, AppError> {
        let entity = self.get_typed(id).await?;
        to_json(&entity)
    }

    /// An unknown id is a 404 whatever the body holds; validation and the empty-patch
    /// check only run against an existing entity.
    async fn update(&self, id: &str, body: Map<String, Value>) -> Result<Value, AppError> {
        self.get_typed(id).await?;
        let valid = RequestValidator::validate_partial(R::schema(), &body)?;
        let patch: R::Patch = typed(R::KIND, valid)?;
        let updated = self.update_typed(id, patch).await?;
        to_json(&updated)
    }

    async fn delete(&self, id: &str) -> Result<Value, AppError> {
        self.delete_typed(id).await?;
        to_json(&Message::deleted(R::KIND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, User};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn users() -> ResourceService<User, MemoryStore<User>> {
        ResourceService::new(MemoryStore::new())
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn john() -> Map<String, Value> {
        obj(json!({"first_name": "John", "last_name": "Doe", "email": "john.doe@example.com"}))
    }

    #[tokio::test]
    async fn create_assigns_id_and_equal_timestamps() {
        let svc = users();
        let before = now();
        let created = ResourceOps::create(&svc, john()).await.unwrap();
        let after = now();
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert_eq!(created["created_at"], created["updated_at"]);
        let at: chrono::DateTime<chrono::Utc> = serde_json::from_value(created["created_at"].clone()).unwrap();
        assert!(at >= before && at <= after);
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let svc = users();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let v = ResourceOps::create(&svc, john()).await.unwrap();
            assert!(ids.insert(v["id"].as_str().unwrap().to_string()));
        }
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let svc = users();
        for _ in 0..15 {
            ResourceOps::create(&svc, john()).await.unwrap();
        }
        for (offset, limit) in [(0, 10), (10, 10), (14, 1), (20, 5), (0, 100)] {
            let page = ResourceOps::list(&svc, PageParams { offset, limit }).await.unwrap();
            assert_eq!(page.total, 15);
            assert_eq!(page.items.len(), limit.min(15usize.saturating_sub(offset)));
            let stamps: Vec<chrono::DateTime<chrono::Utc>> = page
                .items
                .iter()
                .map(|v| serde_json::from_value(v["created_at"].clone()).unwrap())
                .collect();
            let mut sorted = stamps.clone();
            sorted.sort_by(|a, b| b.cmp(a));
            assert_eq!(stamps, sorted);
        }
    }

    #[tokio::test]
    async fn update_one_field_leaves_the_rest() {
        let svc = users();
        let created = ResourceOps::create(&svc, john()).await.unwrap();
        let id = created["id"].as_str().unwrap();
        let updated = ResourceOps::update(&svc, id, obj(json!({"last_name": "Smith"}))).await.unwrap();
        assert_eq!(updated["last_name"], "Smith");
        for key in ["id", "first_name", "email", "created_at"] {
            assert_eq!(updated[key], created[key], "{} changed", key);
        }
        let before: chrono::DateTime<chrono::Utc> = serde_json::from_value(created["updated_at"].clone()).unwrap();
        let after: chrono::DateTime<chrono::Utc> = serde_json::from_value(updated["updated_at"].clone()).unwrap();
        assert!(after > before);
    }

    #[tokio::test]
    async fn empty_update_is_bad_request() {
        let svc = users();
        let created = ResourceOps::create(&svc, john()).await.unwrap();
        let id = created["id"].as_str().unwrap();
        let err = ResourceOps::update(&svc, id, Map::new()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = ResourceOps::update(&svc, id, obj(json!({"unknown": "x"}))).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let svc = users();
        assert!(matches!(ResourceOps::get(&svc, "nope").await, Err(AppError::NotFound(_))));
        let err = ResourceOps::update(&svc, "nope", obj(json!({"last_name": "Smith"}))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("User") && m.contains("nope")));
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found_before_body_checks() {
        let svc = users();
        let err = ResourceOps::update(&svc, "nope", Map::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = ResourceOps::update(&svc, "nope", obj(json!({"email": "bad"}))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_twice() {
        let svc = users();
        let created = ResourceOps::create(&svc, john()).await.unwrap();
        let id = created["id"].as_str().unwrap();
        let first = ResourceOps::delete(&svc, id).await.unwrap();
        assert_eq!(first["message"], "User deleted successfully");
        assert!(matches!(ResourceOps::delete(&svc, id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn validation_runs_before_storage() {
        let svc = users();
        let err = ResourceOps::create(&svc, obj(json!({"first_name": ""}))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(svc.store().is_empty().unwrap());
    }

    #[tokio::test]
    async fn employee_round_trip_through_json() {
        let svc: ResourceService<Employee, MemoryStore<Employee>> = ResourceService::new(MemoryStore::new());
        let created = ResourceOps::create(
            &svc,
            obj(json!({
                "first_name": "Alice",
                "last_name": "Williams",
                "email": "alice.williams@example.com",
                "department": "Engineering",
                "position": "SENIOR_SPECIALIST",
                "hire_date": "2021-03-15"
            })),
        )
        .await
        .unwrap();
        assert_eq!(created["position"], "Senior Specialist");
        assert_eq!(created["contract_end_date"], Value::Null);
        let id = created["id"].as_str().unwrap();
        let updated = ResourceOps::update(&svc, id, obj(json!({"contract_end_date": "2025-03-15"})))
            .await
            .unwrap();
        assert_eq!(updated["contract_end_date"], "2025-03-15");
        assert_eq!(updated["hire_date"], "2021-03-15");
    }
}
