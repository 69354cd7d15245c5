use openroute_core::http::response::{IntoResponse, Response};
use openroute_core::http::StatusCode;
use openroute_core::error_response;

/// Why a document could not be generated from the registered routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Two different definitions were given for one component name.
    ConflictingComponent { kind: String, name: String },
    /// A schema did not render to something usable at `location`.
    InvalidSchema { location: String, reason: String },
    /// A response status key that is neither `default`, a status code nor a
    /// `1XX`..`5XX` range.
    InvalidResponseKey { route: String, key: String },
    /// A `{name}` in the path template that the declared path-parameter
    /// schema does not define.
    MissingPathParameter { route: String, name: String },
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::ConflictingComponent { kind, name } => {
                write!(f, "conflicting definitions for component {kind}/{name}")
            }
            DocumentError::InvalidSchema { location, reason } => {
                write!(f, "invalid schema at {location}: {reason}")
            }
            DocumentError::InvalidResponseKey { route, key } => {
                write!(f, "invalid response key '{key}' on {route}")
            }
            DocumentError::MissingPathParameter { route, name } => {
                write!(f, "path parameter '{name}' of {route} is missing from its params schema")
            }
        }
    }
}

impl std::error::Error for DocumentError {}

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}
