//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::ErrorResponse;

/// Fields of a JSON request body that must never be written to the logs.
const REDACTED_FIELDS: [&str; 1] = ["password"];

const REDACTED_VALUE: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in JSON request bodies are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return (
                StatusCode::BAD_REQUEST,
                axum::Json(ErrorResponse::new("Could not read request body")),
            )
                .into_response();
        }
    };

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        log_request(&parts, &redact_json_fields(&body_bytes));
    } else {
        log_request(&parts, &String::from_utf8_lossy(&body_bytes));
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new("Internal server error")),
            )
                .into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Render a JSON body as text with the values of [REDACTED_FIELDS] masked.
///
/// Bodies that are not valid JSON are logged as is since they will be rejected by the handler.
fn redact_json_fields(body: &Bytes) -> String {
    let mut value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return String::from_utf8_lossy(body).to_string(),
    };

    if let Value::Object(fields) = &mut value {
        for field_name in REDACTED_FIELDS {
            if let Some(field) = fields.get_mut(field_name) {
                *field = Value::String(REDACTED_VALUE.to_owned());
            }
        }
    }

    value.to_string()
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The longest prefix of `text` that is at most [LOG_BODY_LENGTH_LIMIT] bytes and ends on a
/// character boundary.
fn truncate(text: &str) -> &str {
    let end = text
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|&index| index <= LOG_BODY_LENGTH_LIMIT)
        .last()
        .unwrap_or(0);

    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        text
    } else {
        &text[..end]
    }
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {:}...",
            parts.method,
            parts.uri,
            truncate(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {:}...",
            parts.status,
            truncate(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}


#[cfg(test)]
mod truncate_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncate};

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate("hello"), "hello");
    }

    #[test]
    fn long_text_is_cut_at_limit() {
        let text = "a".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        assert_eq!(truncate(&text).len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn does_not_split_multibyte_characters() {
        // Each "é" is two bytes, so every character boundary after the first byte is odd.
        let text = format!("a{}", "é".repeat(LOG_BODY_LENGTH_LIMIT));

        let truncated = truncate(&text);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(text.is_char_boundary(truncated.len()));
    }
}
