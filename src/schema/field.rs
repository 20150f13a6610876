//! Declarative field descriptions and the three views derived from them.

use std::collections::{HashMap, HashSet};

/// One member of an enumeration: SCREAMING_CASE name and the raw wire value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumMember {
    pub name: &'static str,
    pub value: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct EnumSpec {
    /// Kebab-case name used by `/api/enums/{name}` (e.g. "employee-positions").
    pub name: &'static str,
    pub members: &'static [EnumMember],
}

impl EnumSpec {
    /// Resolve input to a member: exact raw value first, then the member name after
    /// spaces -> underscores and upper-casing ("senior specialist" -> SENIOR_SPECIALIST).
    pub fn resolve(&self, input: &str) -> Option<&EnumMember> {
        if let Some(m) = self.members.iter().find(|m| m.value == input) {
            return Some(m);
        }
        let normalized = input.trim().replace(' ', "_").to_uppercase();
        self.members.iter().find(|m| m.name == normalized)
    }
}

/// Map field name -> enumeration, consumed by the metadata generator.
pub type EnumMap = HashMap<&'static str, &'static EnumSpec>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Bool,
    Integer,
    Date,
    DateTime,
    Enum(&'static EnumSpec),
}

/// How a field takes part in the Create View.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// Must be supplied; has no default.
    Required,
    /// May be omitted; the create contract supplies a default.
    Optional,
    /// Not part of the Create/Update views (id, timestamps).
    Excluded,
}

/// Value-level rule checked on top of the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    NonEmpty,
    Email,
    NoDigits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub create: Presence,
    pub nullable: bool,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            create: Presence::Required,
            nullable: false,
            rules: &[],
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            create: Presence::Optional,
            ..self
        }
    }

    pub const fn excluded(self) -> Self {
        Self {
            create: Presence::Excluded,
            ..self
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub const fn rules(self, rules: &'static [Rule]) -> Self {
        Self { rules, ..self }
    }

    pub fn is_writable(&self) -> bool {
        self.create != Presence::Excluded
    }
}

/// Fields every entity carries, in every Response View.
pub const ID_FIELD: FieldSpec = FieldSpec::new("id", FieldType::Text).excluded();
pub const CREATED_AT_FIELD: FieldSpec = FieldSpec::new("created_at", FieldType::DateTime).excluded();
pub const UPDATED_AT_FIELD: FieldSpec = FieldSpec::new("updated_at", FieldType::DateTime)
    .excluded()
    .nullable();

/// Full field list of a resource (its Response View, in output order).
#[derive(Debug)]
pub struct ModelSchema {
    pub fields: &'static [FieldSpec],
}

impl ModelSchema {
    pub fn response_view(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn create_view(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.is_writable())
    }

    /// Same fields as the Create View; every one of them optional.
    pub fn update_view(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.create_view()
    }

    /// A field is required iff the Create View has it as `Presence::Required`.
    pub fn required_fields(&self) -> HashSet<&'static str> {
        self.create_view()
            .filter(|f| f.create == Presence::Required)
            .map(|f| f.name)
            .collect()
    }

    pub fn enum_fields(&self) -> EnumMap {
        self.fields
            .iter()
            .filter_map(|f| match f.ty {
                FieldType::Enum(spec) => Some((f.name, spec)),
                _ => None,
            })
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
