//! Users: name + email.

use crate::error::RegistryError;
use crate::registry::ModelRegistry;
use crate::resource::{Patch, Record, Resource};
use crate::schema::{FieldSpec, FieldType, ModelSchema, Rule, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::store::{MemoryStore, Store};
use serde::{Deserialize, Serialize};

static SCHEMA: ModelSchema = ModelSchema {
    fields: &[
        ID_FIELD,
        FieldSpec::new("first_name", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("last_name", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("email", FieldType::Text).rules(&[Rule::Email]),
        CREATED_AT_FIELD,
        UPDATED_AT_FIELD,
    ],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub record: Record,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Patch for UserPatch {
    fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

impl Resource for User {
    type Create = UserCreate;
    type Patch = UserPatch;

    const KIND: &'static str = "User";
    const ICON: &'static str = "bi-people-fill";

    fn schema() -> &'static ModelSchema {
        &SCHEMA
    }

    fn build(record: Record, input: UserCreate) -> Self {
        User {
            record,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
        }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
    }
}

/// Registration hook: `users` over an in-memory store.
pub fn register_model(registry: &mut ModelRegistry) -> Result<(), RegistryError> {
    register_with_store(registry, MemoryStore::<User>::new())
}

pub fn register_with_store<S: Store<User>>(registry: &mut ModelRegistry, store: S) -> Result<(), RegistryError> {
    registry.register_resource::<User, S>("users", store, Some("Users"))
}
