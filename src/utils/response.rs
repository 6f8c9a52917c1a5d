//! JSON response building shared by every API handler.
//!
//! All responses carry the JSON content type, the CORS headers and a fresh
//! request id, so handlers only decide status and body.

use chrono::{SecondsFormat, Utc};
use http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::core::AlgoError;

/// Standard content types
pub mod content_type {
    pub const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";
    pub const APPLICATION_JSON: &str = "application/json";
}

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    error_code: &'a str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<JsonValue>,
}

/// Response builder bound to the configured CORS origin.
#[derive(Clone, Debug)]
pub struct ResponseBuilder {
    allowed_origins: HeaderValue,
}

impl ResponseBuilder {
    pub fn new(allowed_origins: &str) -> Self {
        let allowed_origins = HeaderValue::from_str(allowed_origins).unwrap_or_else(|e| {
            log::error!("Invalid allowed origins '{allowed_origins}': {e}");
            HeaderValue::from_static("*")
        });
        Self { allowed_origins }
    }

    /// Build a response with the shared headers.
    pub fn raw(&self, status: StatusCode, content_type: &str, body: Vec<u8>) -> Response<Vec<u8>> {
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allowed_origins.clone())
            .header(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS)
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .body(body)
            .unwrap_or_else(|e| {
                log::error!("Failed to build HTTP response: {e}");
                let mut fallback = Response::new(b"Internal Server Error".to_vec());
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }

    pub fn json<T: Serialize>(&self, status: StatusCode, data: &T) -> Response<Vec<u8>> {
        match serde_json::to_vec(data) {
            Ok(body) => self.raw(status, content_type::APPLICATION_JSON, body),
            Err(e) => {
                log::error!("Failed to serialize JSON response: {e}");
                self.error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "JSON serialization failed",
                    None,
                )
            }
        }
    }

    pub fn ok<T: Serialize>(&self, data: &T) -> Response<Vec<u8>> {
        self.json(StatusCode::OK, data)
    }

    /// Build the `{error, error_code, timestamp, details?}` body.
    pub fn error(
        &self,
        status: StatusCode,
        error_code: &str,
        message: &str,
        details: Option<JsonValue>,
    ) -> Response<Vec<u8>> {
        let body = ErrorBody {
            error: message,
            error_code,
            timestamp: timestamp(),
            details,
        };
        let bytes = serde_json::to_vec(&body).unwrap_or_else(|e| {
            log::error!("Failed to serialize error response: {e}");
            b"{}".to_vec()
        });
        self.raw(status, content_type::APPLICATION_JSON, bytes)
    }

    /// Maps an [`AlgoError`] to its status, code and body. Validation errors
    /// carry a `details.validation_errors` list.
    pub fn for_error(&self, err: &AlgoError) -> Response<Vec<u8>> {
        match err {
            AlgoError::Validation { field, message } => {
                let details = json!({
                    "validation_errors": [{
                        "field": field.as_deref().unwrap_or("unknown"),
                        "message": message,
                        "type": "validation_error",
                    }]
                });
                self.error(
                    err.status_code(),
                    err.error_code(),
                    "Request validation failed",
                    Some(details),
                )
            }
            AlgoError::ArrayOperation(_) | AlgoError::PalindromeOperation(_) => self.error(
                err.status_code(),
                err.error_code(),
                &err.message(),
                None,
            ),
            _ => self.error(
                err.status_code(),
                err.error_code(),
                "Internal server error",
                None,
            ),
        }
    }

    pub fn no_content(&self) -> Response<Vec<u8>> {
        self.raw(StatusCode::NO_CONTENT, content_type::APPLICATION_JSON, Vec::new())
    }
}

/// Common error response helpers
impl ResponseBuilder {
    pub fn bad_request(&self, message: &str) -> Response<Vec<u8>> {
        self.error(StatusCode::BAD_REQUEST, "BAD_REQUEST", message, None)
    }

    pub fn not_found(&self, uri: &str) -> Response<Vec<u8>> {
        let body = json!({
            "error": "Not Found",
            "error_code": "NOT_FOUND",
            "message": format!("The requested URL {uri} was not found on this server."),
            "timestamp": timestamp(),
        });
        self.json(StatusCode::NOT_FOUND, &body)
    }

    pub fn method_not_allowed(&self) -> Response<Vec<u8>> {
        self.error(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "Method Not Allowed",
            None,
        )
    }

    pub fn payload_too_large(&self, limit: usize) -> Response<Vec<u8>> {
        self.error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            &format!("Request body exceeds {limit} bytes"),
            None,
        )
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
