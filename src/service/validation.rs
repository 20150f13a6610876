//! Request validation from schema field specs.
//!
//! Every failing field is collected; the caller gets one `AppError::Validation`
//! listing all of them. Valid input comes back normalized (form strings coerced,
//! enum inputs mapped to their raw value, unknown keys dropped) and ready for
//! `serde_json::from_value` into the typed create/patch struct.

use crate::error::{AppError, ErrorKind, ValidationErrors};
use crate::schema::{FieldSpec, FieldType, ModelSchema, Presence, Rule};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Validated pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageParams {
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("static email pattern")
    })
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create payload: every required Create View field must be present.
    pub fn validate(schema: &ModelSchema, body: &Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let mut errors = ValidationErrors::new();
        let mut out = Map::new();
        for spec in schema.create_view() {
            match body.get(spec.name) {
                Some(v) => {
                    if let Some(v) = check_field(spec, v, &mut errors) {
                        out.insert(spec.name.to_string(), v);
                    }
                }
                None if spec.create == Presence::Required => {
                    errors.push(&["body", spec.name], "Field required", ErrorKind::Missing);
                }
                None => {}
            }
        }
        errors.into_result()?;
        Ok(out)
    }

    /// Validate only the fields present in body (for PATCH). Missing fields are not an error.
    pub fn validate_partial(schema: &ModelSchema, body: &Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let mut errors = ValidationErrors::new();
        let mut out = Map::new();
        for spec in schema.update_view() {
            if let Some(v) = body.get(spec.name) {
                if let Some(v) = check_field(spec, v, &mut errors) {
                    out.insert(spec.name.to_string(), v);
                }
            }
        }
        errors.into_result()?;
        Ok(out)
    }

    /// `offset` (alias `skip`) >= 0, default 0; `limit` in 1..=100, default 10.
    pub fn page(params: &HashMap<String, String>) -> Result<PageParams, AppError> {
        let mut errors = ValidationErrors::new();
        let offset_key = if params.contains_key("offset") { "offset" } else { "skip" };
        let offset = parse_bounded(params.get(offset_key), offset_key, 0, 0, None, &mut errors);
        let limit = parse_bounded(params.get("limit"), "limit", DEFAULT_LIMIT as i64, 1, Some(MAX_LIMIT as i64), &mut errors);
        errors.into_result()?;
        Ok(PageParams {
            offset: offset as usize,
            limit: limit as usize,
        })
    }
}

fn parse_bounded(
    raw: Option<&String>,
    name: &str,
    default: i64,
    min: i64,
    max: Option<i64>,
    errors: &mut ValidationErrors,
) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    let Ok(n) = raw.trim().parse::<i64>() else {
        errors.push(
            &["query", name],
            "Input should be a valid integer, unable to parse string as an integer",
            ErrorKind::IntType,
        );
        return default;
    };
    if n < min {
        errors.push(
            &["query", name],
            format!("Input should be greater than or equal to {}", min),
            ErrorKind::GreaterThanEqual,
        );
        return default;
    }
    if let Some(max) = max {
        if n > max {
            errors.push(
                &["query", name],
                format!("Input should be less than or equal to {}", max),
                ErrorKind::LessThanEqual,
            );
            return default;
        }
    }
    n
}

/// Type-check, coerce and rule-check one value. `None` means it failed (error recorded).
fn check_field(spec: &FieldSpec, v: &Value, errors: &mut ValidationErrors) -> Option<Value> {
    let loc = ["body", spec.name];
    if v.is_null() {
        if spec.nullable {
            return Some(Value::Null);
        }
        errors.push(&loc, "Input may not be null", ErrorKind::NullNotAllowed);
        return None;
    }
    // Empty form input on a nullable non-text field means "no value".
    if spec.nullable && spec.ty != FieldType::Text && v.as_str().map(|s| s.trim().is_empty()).unwrap_or(false) {
        return Some(Value::Null);
    }
    let value = match coerce(spec.ty, v) {
        Ok(value) => value,
        Err((msg, kind)) => {
            errors.push(&loc, msg, kind);
            return None;
        }
    };
    if let Some(s) = value.as_str() {
        for rule in spec.rules {
            if let Err((msg, kind)) = check_rule(*rule, s) {
                errors.push(&loc, msg, kind);
                return None;
            }
        }
    }
    Some(value)
}

fn coerce(ty: FieldType, v: &Value) -> Result<Value, (String, ErrorKind)> {
    match ty {
        FieldType::Text => match v {
            Value::String(_) => Ok(v.clone()),
            _ => Err(("Input should be a valid string".into(), ErrorKind::StringType)),
        },
        FieldType::Bool => match v {
            Value::Bool(_) => Ok(v.clone()),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "off" | "no" => Ok(Value::Bool(false)),
                _ => Err(bool_error()),
            },
            _ => Err(bool_error()),
        },
        FieldType::Integer => match v {
            Value::Number(n) if n.is_i64() => Ok(v.clone()),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|_| int_error()),
            _ => Err(int_error()),
        },
        FieldType::Date => match v.as_str().map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")) {
            Some(Ok(d)) => Ok(Value::String(d.format("%Y-%m-%d").to_string())),
            _ => Err((
                "Input should be a valid date in the format YYYY-MM-DD".into(),
                ErrorKind::DateFormat,
            )),
        },
        FieldType::DateTime => match v.as_str().map(|s| DateTime::parse_from_rfc3339(s.trim())) {
            Some(Ok(_)) => Ok(v.clone()),
            _ => Err(("Input should be a valid RFC 3339 datetime".into(), ErrorKind::DatetimeFormat)),
        },
        FieldType::Enum(spec) => match v.as_str().and_then(|s| spec.resolve(s)) {
            Some(member) => Ok(Value::String(member.value.to_string())),
            None => {
                let allowed: Vec<String> = spec.members.iter().map(|m| format!("'{}'", m.value)).collect();
                Err((
                    format!("Input should be one of {}", allowed.join(", ")),
                    ErrorKind::EnumMember,
                ))
            }
        },
    }
}

fn bool_error() -> (String, ErrorKind) {
    ("Input should be a valid boolean".into(), ErrorKind::BoolType)
}

fn int_error() -> (String, ErrorKind) {
    ("Input should be a valid integer".into(), ErrorKind::IntType)
}

fn check_rule(rule: Rule, s: &str) -> Result<(), (String, ErrorKind)> {
    match rule {
        Rule::NonEmpty if s.trim().is_empty() => Err(("Fields cannot be empty".into(), ErrorKind::Empty)),
        Rule::Email if !email_re().is_match(s.trim()) => Err((
            "value is not a valid email address".into(),
            ErrorKind::Email,
        )),
        Rule::NoDigits if s.chars().any(|c| c.is_ascii_digit()) => Err((
            "must not contain numbers".into(),
            ErrorKind::ContainsDigits,
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Subscriber, User};
    use crate::resource::Resource;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn kinds(err: AppError) -> Vec<(String, ErrorKind)> {
        match err {
            AppError::Validation(errors) => errors
                .errors()
                .iter()
                .map(|e| (e.loc.join("."), e.kind))
                .collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_collects_every_failure() {
        let body = obj(json!({"first_name": "  ", "email": "not-an-email"}));
        let err = RequestValidator::validate(User::schema(), &body).unwrap_err();
        let got = kinds(err);
        assert_eq!(
            got,
            vec![
                ("body.first_name".to_string(), ErrorKind::Empty),
                ("body.last_name".to_string(), ErrorKind::Missing),
                ("body.email".to_string(), ErrorKind::Email),
            ]
        );
    }

    #[test]
    fn create_drops_unknown_and_server_owned_keys() {
        let body = obj(json!({
            "id": "forged",
            "created_at": "2020-01-01T00:00:00Z",
            "first_name": "John",
            "last_name": "Doe",
            "email": "john.doe@example.com",
            "nickname": "JD"
        }));
        let out = RequestValidator::validate(User::schema(), &body).unwrap();
        assert_eq!(out.len(), 3);
        assert!(!out.contains_key("id"));
        assert!(!out.contains_key("nickname"));
    }

    #[test]
    fn form_strings_are_coerced() {
        let body = obj(json!({
            "name": "Sarah Taylor",
            "email": "sarah.taylor@example.com",
            "subscription_type": "Basic",
            "is_active": "on"
        }));
        let out = RequestValidator::validate(Subscriber::schema(), &body).unwrap();
        assert_eq!(out["is_active"], json!(true));
    }

    #[test]
    fn employee_enum_and_dates() {
        let body = obj(json!({
            "first_name": "Emma",
            "last_name": "Davis",
            "email": "emma.davis@example.com",
            "department": "HR",
            "position": "vice president",
            "hire_date": "2020-09-10",
            "contract_end_date": ""
        }));
        let out = RequestValidator::validate(Employee::schema(), &body).unwrap();
        assert_eq!(out["position"], json!("Vice President"));
        assert_eq!(out["contract_end_date"], Value::Null);

        let bad = obj(json!({
            "first_name": "Emma",
            "last_name": "Davis",
            "email": "emma.davis@example.com",
            "department": "HR",
            "position": "Intern",
            "hire_date": "10/09/2020"
        }));
        let got = kinds(RequestValidator::validate(Employee::schema(), &bad).unwrap_err());
        assert_eq!(
            got,
            vec![
                ("body.position".to_string(), ErrorKind::EnumMember),
                ("body.hire_date".to_string(), ErrorKind::DateFormat),
            ]
        );
    }

    #[test]
    fn partial_only_checks_present_fields() {
        let out = RequestValidator::validate_partial(User::schema(), &obj(json!({"last_name": "Smith"}))).unwrap();
        assert_eq!(out.len(), 1);

        let err = RequestValidator::validate_partial(User::schema(), &obj(json!({"email": null}))).unwrap_err();
        assert_eq!(kinds(err), vec![("body.email".to_string(), ErrorKind::NullNotAllowed)]);

        let empty = RequestValidator::validate_partial(User::schema(), &obj(json!({"unknown": 1}))).unwrap();
        assert!(empty.is_empty());
    }

    static TEAM: ModelSchema = ModelSchema {
        fields: &[
            FieldSpec::new("name", FieldType::Text).rules(&[Rule::NonEmpty, Rule::NoDigits]),
            FieldSpec::new("headcount", FieldType::Integer),
            FieldSpec::new("founded", FieldType::DateTime).optional(),
        ],
    };

    #[test]
    fn custom_schema_integers_and_rules() {
        let out = RequestValidator::validate(&TEAM, &obj(json!({"name": "Platform", "headcount": "12"}))).unwrap();
        assert_eq!(out["headcount"], json!(12));

        let bad = obj(json!({"name": "Team 7", "headcount": 1.5, "founded": "yesterday"}));
        assert_eq!(
            kinds(RequestValidator::validate(&TEAM, &bad).unwrap_err()),
            vec![
                ("body.name".to_string(), ErrorKind::ContainsDigits),
                ("body.headcount".to_string(), ErrorKind::IntType),
                ("body.founded".to_string(), ErrorKind::DatetimeFormat),
            ]
        );
    }

    #[test]
    fn page_defaults_and_bounds() {
        let none = HashMap::new();
        assert_eq!(RequestValidator::page(&none).unwrap(), PageParams::default());

        let q: HashMap<String, String> = [("skip".to_string(), "20".to_string()), ("limit".to_string(), "100".to_string())]
            .into_iter()
            .collect();
        assert_eq!(RequestValidator::page(&q).unwrap(), PageParams { offset: 20, limit: 100 });

        for (k, v, kind) in [
            ("limit", "0", ErrorKind::GreaterThanEqual),
            ("limit", "101", ErrorKind::LessThanEqual),
            ("offset", "-1", ErrorKind::GreaterThanEqual),
            ("limit", "ten", ErrorKind::IntType),
        ] {
            let q: HashMap<String, String> = [(k.to_string(), v.to_string())].into_iter().collect();
            let got = kinds(RequestValidator::page(&q).unwrap_err());
            assert_eq!(got, vec![(format!("query.{}", k), kind)]);
        }
    }
}
