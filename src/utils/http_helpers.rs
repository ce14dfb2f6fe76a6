use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

/// A general purpose HTTP error type that can be converted into an
/// `IntoResponse`. Carries a stable machine-readable code alongside the
/// human-readable message.
pub struct HTTPError {
    status: StatusCode,
    message: String,
    code: Option<&'static str>,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>, code: Option<&'static str>) -> Self {
        HTTPError {
            status,
            message: message.into(),
            code,
        }
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        let body = match self.code {
            Some(code) => json!({ "error": self.message, "code": code }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
