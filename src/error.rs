//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Model '{0}' not registered")]
    NotRegistered(String),
    #[error("registry is sealed; cannot register '{0}'")]
    Sealed(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("entity must have an id")]
    MissingId,
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Machine-readable kind of a field validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Missing,
    NullNotAllowed,
    StringType,
    BoolType,
    IntType,
    DateFormat,
    DatetimeFormat,
    Empty,
    Email,
    EnumMember,
    ContainsDigits,
    GreaterThanEqual,
    LessThanEqual,
}

/// One failed field: where, what, and which rule.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, loc: &[&str], msg: impl Into<String>, kind: ErrorKind) {
        self.0.push(FieldError {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was collected, otherwise the whole list as one error.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(ValidationErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ValidationBody<'a> {
    pub success: bool,
    pub errors: &'a ValidationErrors,
}

const INTERNAL_MESSAGE: &str = "internal server error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(errors) => {
                let body = ValidationBody {
                    success: false,
                    errors,
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Registry(RegistryError::NotRegistered(name)) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Model '{}' not found", name),
            ),
            AppError::Registry(_) | AppError::Store(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: same masked 500 as any other internal failure.
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_lists_every_field() {
        let mut errors = ValidationErrors::new();
        errors.push(&["body", "email"], "value is not a valid email address", ErrorKind::Email);
        errors.push(&["body", "first_name"], "field required", ErrorKind::Missing);
        let resp = AppError::Validation(errors).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let v = body_json(resp).await;
        assert_eq!(v["success"], false);
        assert_eq!(v["errors"][0]["loc"], serde_json::json!(["body", "email"]));
        assert_eq!(v["errors"][0]["type"], "email");
        assert_eq!(v["errors"][1]["type"], "missing");
    }

    #[tokio::test]
    async fn unregistered_model_maps_to_404() {
        let resp = AppError::from(RegistryError::NotRegistered("nonexistent".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["message"], "Model 'nonexistent' not found");
    }

    #[tokio::test]
    async fn internal_errors_are_masked() {
        let resp = AppError::Store(StoreError::Poisoned).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "internal_error");
        assert_eq!(v["error"]["message"], INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn panics_render_as_internal_error() {
        let resp = panic_response(Box::new("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v = body_json(resp).await;
        assert!(!v["error"]["message"].as_str().unwrap().contains("boom"));
    }
}
