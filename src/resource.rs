//! Resource contract: one implementation per entity type ties together its schema,
//! typed create input, typed patch, and the common record fields.

use crate::schema::ModelSchema;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Identifier and timestamps carried by every entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Fresh record: time-ordered UUIDv7 id, `created_at == updated_at == now`.
    pub fn new_at(now: DateTime<Utc>) -> Self {
        Record {
            id: uuid::Uuid::now_v7().to_string(),
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Stamp `updated_at`, strictly after both its previous value and `created_at`.
    pub fn touch(&mut self) {
        let floor = self.updated_at.unwrap_or(self.created_at).max(self.created_at);
        let now = now();
        self.updated_at = Some(if now > floor {
            now
        } else {
            floor + Duration::microseconds(1)
        });
    }
}

/// Current time at microsecond precision (what PostgreSQL `timestamptz` keeps).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Typed partial update: every field optional.
pub trait Patch {
    /// True when no field is present, i.e. there is nothing to change.
    fn is_empty(&self) -> bool;
}

pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Create: DeserializeOwned + Send + 'static;
    type Patch: Patch + DeserializeOwned + Send + 'static;

    /// Singular type name used in messages ("User not found").
    const KIND: &'static str;
    /// Icon hint for the generic front-end.
    const ICON: &'static str = "bi-table";

    fn schema() -> &'static ModelSchema;

    fn build(record: Record, input: Self::Create) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Field-by-field overwrite; fields absent from the patch keep their value.
    fn apply(&mut self, patch: Self::Patch);

    fn id(&self) -> &str {
        &self.record().id
    }
}
