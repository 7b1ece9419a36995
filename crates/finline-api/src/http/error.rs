//! Application error type mapping to HTTP status codes.
//!
//! Everything that can fail inside dispatch resolves to best-effort reply
//! text instead of an error; what's left here is request-level rejection
//! (bad signature, unparsable payload).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-level errors surfaced to the platform.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid webhook signature.
    BadSignature(String),
    /// The payload did not parse as a webhook envelope.
    BadPayload(String),
    /// Anything else.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadSignature(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_SIGNATURE", msg.clone())
            }
            AppError::BadPayload(msg) => (StatusCode::BAD_REQUEST, "BAD_PAYLOAD", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
