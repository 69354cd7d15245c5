use bytes::Bytes;
use http::header::{HeaderMap, HeaderName};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::json_path::resolve_path;

/// A collected response with chainable assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_created(self) -> Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "expected {expected}, got {}\nbody: {}",
            self.status,
            self.text()
        );
        self
    }

    /// Assert the default validation failure: `400`, the given target, and
    /// at least one error detail for `field`.
    pub fn assert_validation_error(self, target: &str, field: &str) -> Self {
        let this = self.assert_bad_request();
        let body: Value = this.json();
        assert_eq!(body["error"], "Validation failed", "not a validation error: {body}");
        assert_eq!(body["target"], target, "wrong validation target: {body}");
        let details = body["details"].as_array().cloned().unwrap_or_default();
        assert!(
            details.iter().any(|d| d["field"] == field),
            "no validation error for field `{field}`: {body}"
        );
        this
    }

    /// Assert that a JSON path resolves to `expected`.
    ///
    /// ```ignore
    /// resp.assert_json_path("details[0].field", "count")
    ///     .assert_json_path("details.len()", 1);
    /// ```
    pub fn assert_json_path(self, path: &str, expected: impl Into<Value>) -> Self {
        let root: Value = self.json();
        let actual = resolve_path(&root, path);
        let expected = expected.into();
        assert_eq!(
            actual, expected,
            "JSON path `{path}`\n  expected: {expected}\n  actual:   {actual}\n  body: {root}"
        );
        self
    }

    pub fn assert_json_path_fn(self, path: &str, predicate: impl FnOnce(&Value) -> bool) -> Self {
        let root: Value = self.json();
        let actual = resolve_path(&root, path);
        assert!(predicate(&actual), "JSON path `{path}` predicate failed\n  value: {actual}\n  body: {root}");
        self
    }

    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        assert_eq!(self.header(name), Some(expected), "header `{name}`");
        self
    }

    /// Deserialize the value at a JSON path.
    pub fn json_path<T: DeserializeOwned>(&self, path: &str) -> T {
        let root: Value = self.json();
        let value = resolve_path(&root, path);
        serde_json::from_value(value.clone())
            .unwrap_or_else(|e| panic!("JSON path `{path}`: {e}\n  value: {value}\n  body: {root}"))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name: HeaderName = name.parse().ok()?;
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON: {e}\nbody: {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
