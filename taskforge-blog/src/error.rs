/// Error handling for the blog server
///
/// Failures map to minimal HTML status pages. Detail goes to the tracing
/// sink only; response bodies never carry SQL text, stack traces, or
/// request internals.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

/// Blog result type alias
pub type BlogResult<T> = Result<T, BlogError>;

/// Unified blog error type
#[derive(Debug)]
pub enum BlogError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

impl fmt::Display for BlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            BlogError::NotFound(msg) => write!(f, "Not found: {}", msg),
            BlogError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BlogError {}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            BlogError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            BlogError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            BlogError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        let body = crate::render::error_page(status.as_u16(), &message);
        (status, Html(body)).into_response()
    }
}

impl From<sqlx::Error> for BlogError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => BlogError::NotFound("Page not found".to_string()),
            _ => BlogError::InternalError(format!("Database error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlogError::NotFound("Page not found".to_string());
        assert_eq!(err.to_string(), "Not found: Page not found");
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let err = BlogError::InternalError("connection refused to 10.0.0.5".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // The diagnostic detail stays in the log; clients get a fixed message
    }
}
