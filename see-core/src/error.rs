use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Build a JSON error response with the standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// Error returned by HTTP handlers.
///
/// Every variant renders as `{ "error": message }` with the matching status.
pub enum HttpError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            HttpError::NotFound(msg) | HttpError::BadRequest(msg) | HttpError::Internal(msg) => {
                msg
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.message(), "request failed");
        }
        let message = match self {
            HttpError::NotFound(msg) | HttpError::BadRequest(msg) | HttpError::Internal(msg) => {
                msg
            }
        };
        error_response(status, message)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            HttpError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            HttpError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl std::fmt::Debug for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl From<crate::config::ConfigError> for HttpError {
    fn from(err: crate::config::ConfigError) -> Self {
        HttpError::Internal(err.to_string())
    }
}
