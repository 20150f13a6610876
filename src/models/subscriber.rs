//! Subscribers: newsletter-style contacts with an active flag.

use crate::error::RegistryError;
use crate::registry::ModelRegistry;
use crate::resource::{Patch, Record, Resource};
use crate::schema::{FieldSpec, FieldType, ModelSchema, Rule, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::store::{MemoryStore, Store};
use serde::{Deserialize, Serialize};

static SCHEMA: ModelSchema = ModelSchema {
    fields: &[
        ID_FIELD,
        FieldSpec::new("name", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("email", FieldType::Text).rules(&[Rule::Email]),
        FieldSpec::new("subscription_type", FieldType::Text).rules(&[Rule::NonEmpty]),
        FieldSpec::new("is_active", FieldType::Bool).optional(),
        CREATED_AT_FIELD,
        UPDATED_AT_FIELD,
    ],
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    #[serde(flatten)]
    pub record: Record,
    pub name: String,
    pub email: String,
    pub subscription_type: String,
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubscriberCreate {
    pub name: String,
    pub email: String,
    pub subscription_type: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubscriberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subscription_type: Option<String>,
    pub is_active: Option<bool>,
}

impl Patch for SubscriberPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.subscription_type.is_none() && self.is_active.is_none()
    }
}

impl Resource for Subscriber {
    type Create = SubscriberCreate;
    type Patch = SubscriberPatch;

    const KIND: &'static str = "Subscriber";
    const ICON: &'static str = "bi-envelope-check-fill";

    fn schema() -> &'static ModelSchema {
        &SCHEMA
    }

    fn build(record: Record, input: SubscriberCreate) -> Self {
        Subscriber {
            record,
            name: input.name,
            email: input.email,
            subscription_type: input.subscription_type,
            is_active: input.is_active,
        }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn apply(&mut self, patch: SubscriberPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.subscription_type {
            self.subscription_type = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
    }
}

/// Registration hook: `subscribers` over an in-memory store.
pub fn register_model(registry: &mut ModelRegistry) -> Result<(), RegistryError> {
    register_with_store(registry, MemoryStore::<Subscriber>::new())
}

pub fn register_with_store<S: Store<Subscriber>>(
    registry: &mut ModelRegistry,
    store: S,
) -> Result<(), RegistryError> {
    registry.register_resource::<Subscriber, S>("subscribers", store, Some("Subscribers"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_active_defaults_to_true() {
        let input: SubscriberCreate = serde_json::from_value(serde_json::json!({
            "name": "Michael Wilson",
            "email": "michael.wilson@example.com",
            "subscription_type": "Premium"
        }))
        .unwrap();
        assert!(input.is_active);
    }
}
