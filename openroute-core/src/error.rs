use crate::http::response::{IntoResponse, Response};
use crate::http::{Json, StatusCode};
use crate::validation::ValidationError;

/// Helper to create a JSON error response with a standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// Error type handlers, hooks and extractors return to produce an HTTP error.
pub enum HttpError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Validation(ValidationError),
    Custom {
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::Validation(err) => err.into_response(),
            HttpError::Custom { status, body } => (status, Json(body)).into_response(),
            HttpError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
            HttpError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            HttpError::Internal(msg) => error_response(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            HttpError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            HttpError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            HttpError::Validation(err) => write!(
                f,
                "Validation Error ({}): {} errors",
                err.target,
                err.errors.len()
            ),
            HttpError::Custom { status, body } => write!(f, "Custom Error ({status}): {body}"),
        }
    }
}

impl std::fmt::Debug for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for HttpError {}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        HttpError::Validation(err)
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::Internal(err.to_string())
    }
}

/// Generate `From<E> for HttpError` implementations that map error types to
/// a specific `HttpError` variant.
///
/// # Example
///
/// ```ignore
/// openroute_core::map_error! {
///     serde_json::Error => BadRequest,
///     std::fmt::Error => Internal,
/// }
/// ```
#[macro_export]
macro_rules! map_error {
    ( $( $err_ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$err_ty> for $crate::HttpError {
                fn from(err: $err_ty) -> Self {
                    $crate::HttpError::$variant(err.to_string())
                }
            }
        )*
    };
}
