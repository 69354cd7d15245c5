use crate::http::response::{IntoResponse, Response};
use crate::http::{Json, StatusCode};
use serde::Serialize;

// ── Targets ────────────────────────────────────────────────

/// The request part a validation step reads from.
///
/// Steps for one route always run in declaration order of this enum:
/// query, then path parameters, then the body (json or form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationTarget {
    Query,
    Param,
    Json,
    Form,
}

impl ValidationTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationTarget::Query => "query",
            ValidationTarget::Param => "param",
            ValidationTarget::Json => "json",
            ValidationTarget::Form => "form",
        }
    }

    pub fn is_body(&self) -> bool {
        matches!(self, ValidationTarget::Json | ValidationTarget::Form)
    }
}

impl std::fmt::Display for ValidationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Error types ────────────────────────────────────────────

/// A field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// A rejected request part: which part failed and every field that failed it.
///
/// Renders as a `400 Bad Request` with the body
/// `{ "error": "Validation failed", "target": "...", "details": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub target: ValidationTarget,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(target: ValidationTarget, errors: Vec<FieldError>) -> Self {
        Self { target, errors }
    }

    /// A failure with exactly one field error.
    pub fn single(
        target: ValidationTarget,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::new(target, vec![FieldError::new(field, message, code)])
    }

    /// The request's body is not in a format this target accepts.
    pub fn unsupported_content_type(target: ValidationTarget, received: Option<&str>) -> Self {
        let message = match received {
            Some(ct) => format!("content type `{ct}` cannot be validated as {target}"),
            None => format!("missing content type; expected a {target} body"),
        };
        Self::single(target, "content-type", message, "unsupported_content_type")
    }

    /// Whether any recorded error is for the given field.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub(crate) fn from_garde(target: ValidationTarget, report: &garde::Report) -> Self {
        let errors = report
            .iter()
            .map(|(path, error)| {
                let field = {
                    let s = path.to_string();
                    if s.is_empty() { "value".to_string() } else { s }
                };
                FieldError::new(field, error.message().to_string(), "validation")
            })
            .collect();
        Self::new(target, errors)
    }

    pub(crate) fn from_json(
        target: ValidationTarget,
        err: serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        use serde_json::error::Category;

        let path = path_string(err.path());
        let inner = err.into_inner();
        match inner.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                Self::single(target, "body", inner.to_string(), "invalid_json")
            }
            Category::Data => Self::from_deserialize_message(target, path, &inner.to_string()),
        }
    }

    pub(crate) fn from_urlencoded(
        target: ValidationTarget,
        err: serde_path_to_error::Error<serde::de::value::Error>,
    ) -> Self {
        let path = path_string(err.path());
        Self::from_deserialize_message(target, path, &err.into_inner().to_string())
    }

    fn from_deserialize_message(target: ValidationTarget, path: String, message: &str) -> Self {
        match missing_field_name(message) {
            Some(name) => {
                let field = if path.is_empty() { name.to_string() } else { format!("{path}.{name}") };
                Self::single(target, field, strip_position(message), "missing_field")
            }
            None => {
                let field = if path.is_empty() { "value".to_string() } else { path };
                Self::single(target, field, strip_position(message), "invalid_type")
            }
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} input", self.target)?;
        for error in &self.errors {
            write!(f, "; {}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": "Validation failed",
            "target": self.target,
            "details": self.errors,
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// `serde_path_to_error` renders the root path as `"."`.
fn path_string(path: &serde_path_to_error::Path) -> String {
    let s = path.to_string();
    if s == "." { String::new() } else { s }
}

/// Extract `name` from serde's "missing field `name`" message.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.split_once("missing field `")?.1;
    rest.split_once('`').map(|(name, _)| name)
}

/// Drop serde_json's trailing " at line X column Y".
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

// Re-export garde::Validate for convenience.
pub use garde::Validate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_extracted() {
        assert_eq!(missing_field_name("missing field `name`"), Some("name"));
        assert_eq!(
            missing_field_name("missing field `count` at line 1 column 2"),
            Some("count")
        );
        assert_eq!(missing_field_name("invalid type: string"), None);
    }

    #[test]
    fn position_suffix_is_stripped() {
        assert_eq!(
            strip_position("invalid type: string \"x\", expected i64 at line 1 column 12"),
            "invalid type: string \"x\", expected i64"
        );
        assert_eq!(strip_position("no position here"), "no position here");
    }

    #[test]
    fn json_type_error_names_the_field() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Item {
            count: i64,
        }

        let de = &mut serde_json::Deserializer::from_str(r#"{"count": "x"}"#);
        let err = serde_path_to_error::deserialize::<_, Item>(de).unwrap_err();
        let err = ValidationError::from_json(ValidationTarget::Json, err);
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "count");
        assert_eq!(err.errors[0].code, "invalid_type");
    }

    #[test]
    fn json_syntax_error_is_reported_on_body() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Item {
            count: i64,
        }

        let de = &mut serde_json::Deserializer::from_str("{not json");
        let err = serde_path_to_error::deserialize::<_, Item>(de).unwrap_err();
        let err = ValidationError::from_json(ValidationTarget::Json, err);
        assert_eq!(err.errors[0].field, "body");
        assert_eq!(err.errors[0].code, "invalid_json");
    }

    #[test]
    fn display_lists_fields() {
        let err = ValidationError::single(ValidationTarget::Query, "name", "missing", "missing_field");
        assert_eq!(err.to_string(), "invalid query input; name: missing");
    }
}
