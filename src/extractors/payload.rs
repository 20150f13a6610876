//! Request body as a flat JSON object, from either JSON or a urlencoded form.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::{Map, Value};

/// Raw create/update payload. Form fields arrive as strings and are coerced later by
/// the validator; a repeated form key keeps its last value.
#[derive(Clone, Debug, Default)]
pub struct Payload(pub Map<String, Value>);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Oversized bodies keep axum's 413; every other body problem is a 400.
fn reject(status: StatusCode, text: String, rejection: impl IntoResponse) -> Response {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return rejection.into_response();
    }
    AppError::BadRequest(text).into_response()
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| reject(e.status(), e.body_text(), e))?;
            let map = pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
            return Ok(Payload(map));
        }
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| reject(e.status(), e.body_text(), e))?;
        match value {
            Value::Object(map) => Ok(Payload(map)),
            _ => Err(AppError::BadRequest("body must be a JSON object".into()).into_response()),
        }
    }
}
