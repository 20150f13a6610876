//! Field descriptors for a generic front-end (forms and tables without per-resource UI code).

use crate::case::to_display_name;
use crate::schema::{EnumMap, EnumSpec, FieldSpec, FieldType};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumOption {
    pub value: &'static str,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldMetadata {
    pub name: &'static str,
    pub display_name: String,
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub editable: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    pub name: String,
    pub display_name: String,
    pub icon: &'static str,
    pub fields: Vec<FieldMetadata>,
}

/// Options in declaration order; display name is the member name title-cased.
pub fn enum_options(spec: &EnumSpec) -> Vec<EnumOption> {
    spec.members
        .iter()
        .map(|m| EnumOption {
            value: m.value,
            name: to_display_name(m.name),
        })
        .collect()
}

/// Semantic type tag, first match wins.
fn field_type(field: &FieldSpec, enum_fields: &EnumMap) -> &'static str {
    if enum_fields.contains_key(field.name) {
        "enum"
    } else if field.ty == FieldType::Bool {
        "boolean"
    } else if field.name == "email" {
        "email"
    } else if field.name == "created_at" {
        "datetime"
    } else if field.name.contains("date") {
        "date"
    } else {
        "text"
    }
}

/// Describe every Response View field. `required` is membership in the Create View's required set.
pub fn describe_fields(
    response_view: &[FieldSpec],
    required: &HashSet<&'static str>,
    enum_fields: &EnumMap,
) -> Vec<FieldMetadata> {
    response_view
        .iter()
        .map(|field| {
            let spec = enum_fields.get(field.name);
            FieldMetadata {
                name: field.name,
                display_name: to_display_name(field.name),
                field_type: field_type(field, enum_fields),
                editable: field.name != "id" && field.name != "created_at",
                required: required.contains(field.name),
                enum_name: spec.map(|s| s.name),
                options: spec.map(|s| enum_options(s)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Subscriber, User};
    use crate::resource::Resource;
    use crate::schema::{EnumMember, ModelSchema, Presence};

    static PLANS: EnumSpec = EnumSpec {
        name: "plans",
        members: &[
            EnumMember { name: "FREE_TIER", value: "free" },
            EnumMember { name: "PRO", value: "pro" },
            EnumMember { name: "TEAM_PLUS", value: "team" },
        ],
    };

    static MIXED: ModelSchema = ModelSchema {
        fields: &[
            FieldSpec::new("verified", FieldType::Bool),
            FieldSpec::new("email", FieldType::Text),
            FieldSpec::new("plan", FieldType::Enum(&PLANS)),
        ],
    };

    #[test]
    fn boolean_email_and_enum() {
        let fields = describe_fields(MIXED.response_view(), &MIXED.required_fields(), &MIXED.enum_fields());
        assert_eq!(fields.len(), 3);
        let types: Vec<_> = fields.iter().map(|f| f.field_type).collect();
        assert_eq!(types, vec!["boolean", "email", "enum"]);

        let options = fields[2].options.as_ref().unwrap();
        assert_eq!(options.len(), 3);
        let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Free Tier", "Pro", "Team Plus"]);
        assert_eq!(options[0].value, "free");
        assert!(fields[0].options.is_none());
    }

    #[test]
    fn explicit_enum_map_takes_precedence() {
        let mut map = MIXED.enum_fields();
        map.insert("verified", &PLANS);
        let fields = describe_fields(MIXED.response_view(), &HashSet::new(), &map);
        assert_eq!(fields[0].field_type, "enum");

        let fields = describe_fields(MIXED.response_view(), &HashSet::new(), &EnumMap::new());
        assert_eq!(fields[2].field_type, "text");
    }

    #[test]
    fn user_fields() {
        let schema = User::schema();
        let fields = describe_fields(schema.response_view(), &schema.required_fields(), &schema.enum_fields());
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.name, f.display_name.as_str(), f.field_type, f.editable, f.required))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id", "Id", "text", false, false),
                ("first_name", "First Name", "text", true, true),
                ("last_name", "Last Name", "text", true, true),
                ("email", "Email", "email", true, true),
                ("created_at", "Created At", "datetime", false, false),
                ("updated_at", "Updated At", "date", true, false),
            ]
        );
    }

    #[test]
    fn employee_and_subscriber_required_sets() {
        let schema = Employee::schema();
        let fields = describe_fields(schema.response_view(), &schema.required_fields(), &schema.enum_fields());
        let by_name = |n: &str| fields.iter().find(|f| f.name == n).unwrap().clone();
        assert_eq!(by_name("hire_date").field_type, "date");
        assert!(by_name("hire_date").required);
        assert_eq!(by_name("contract_end_date").field_type, "date");
        assert!(!by_name("contract_end_date").required);
        let position = by_name("position");
        assert_eq!(position.field_type, "enum");
        assert_eq!(position.enum_name, Some("employee-positions"));
        assert_eq!(position.options.unwrap().len(), 9);

        let schema = Subscriber::schema();
        let active = schema.field("is_active").unwrap();
        assert_eq!(active.create, Presence::Optional);
        let fields = describe_fields(schema.response_view(), &schema.required_fields(), &schema.enum_fields());
        let active = fields.iter().find(|f| f.name == "is_active").unwrap();
        assert_eq!(active.field_type, "boolean");
        assert!(!active.required);
    }
}
