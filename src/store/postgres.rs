//! PostgreSQL-backed store: one table per resource, entity kept as a JSONB payload.
//! Every call borrows one pooled connection and returns it when the call completes.

use super::Store;
use crate::error::StoreError;
use crate::resource::Resource;
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use std::marker::PhantomData;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("static identifier pattern"))
}

/// Only plain lower-case identifiers are accepted, so they can be spliced into DDL unquoted.
fn checked_identifier(s: &str) -> Result<&str, StoreError> {
    if identifier_re().is_match(s) {
        Ok(s)
    } else {
        Err(StoreError::InvalidIdentifier(s.to_string()))
    }
}

/// Create `schema` if missing.
pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    let schema = checked_identifier(schema)?;
    let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", schema);
    tracing::debug!(sql = %sql, "query");
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

pub struct PgStore<R> {
    pool: PgPool,
    table: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> PgStore<R> {
    /// Store over `schema.table`. Identifiers are validated, the table is not created; see `ensure_table`.
    pub fn new(pool: PgPool, schema: &str, table: &str) -> Result<Self, StoreError> {
        let qualified = format!("{}.{}", checked_identifier(schema)?, checked_identifier(table)?);
        Ok(PgStore {
            pool,
            table: qualified,
            _resource: PhantomData,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL,
                payload JSONB NOT NULL
            )
            "#,
            self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        let index = format!(
            "CREATE INDEX IF NOT EXISTS {}_created_at_idx ON {} (created_at DESC, id DESC)",
            self.table.replace('.', "_"),
            self.table
        );
        sqlx::query(&index).execute(&self.pool).await?;
        Ok(())
    }
}

fn decode<R: Resource>(payload: Value) -> Result<R, StoreError> {
    Ok(serde_json::from_value(payload)?)
}

#[async_trait]
impl<R: Resource> Store<R> for PgStore<R> {
    async fn create(&self, entity: R) -> Result<R, StoreError> {
        if entity.id().is_empty() {
            return Err(StoreError::MissingId);
        }
        let sql = format!(
            "INSERT INTO {} (id, created_at, payload) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET created_at = EXCLUDED.created_at, payload = EXCLUDED.payload",
            self.table
        );
        tracing::debug!(sql = %sql, id = %entity.id(), "query");
        let payload = serde_json::to_value(&entity)?;
        sqlx::query(&sql)
            .bind(entity.id())
            .bind(entity.record().created_at)
            .bind(Json(payload))
            .execute(&self.pool)
            .await?;
        Ok(entity)
    }

    async fn list(&self, offset: usize, limit: usize) -> Result<(Vec<R>, usize), StoreError> {
        let count_sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let page_sql = format!(
            "SELECT payload FROM {} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            self.table
        );
        tracing::debug!(sql = %page_sql, offset, limit, "query");
        let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(&self.pool).await?;
        let rows: Vec<Value> = sqlx::query_scalar(&page_sql)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;
        let items = rows.into_iter().map(decode).collect::<Result<Vec<R>, _>>()?;
        Ok((items, total.max(0) as usize))
    }

    async fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT payload FROM {} WHERE id = $1", self.table);
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<Value> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(decode).transpose()
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<Option<R>, StoreError> {
        let select = format!("SELECT payload FROM {} WHERE id = $1 FOR UPDATE", self.table);
        let write = format!("UPDATE {} SET payload = $2 WHERE id = $1", self.table);
        tracing::debug!(sql = %select, id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row: Option<Value> = sqlx::query_scalar(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(payload) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let mut current: R = decode(payload)?;
        current.apply(patch);
        current.record_mut().touch();
        sqlx::query(&write)
            .bind(id)
            .bind(Json(serde_json::to_value(&current)?))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(current))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
