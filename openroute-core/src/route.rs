//! Route descriptions: the single declaration both validation wiring and the
//! generated document are derived from.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::http::routing::MethodFilter;
use crate::schema::Schema;

/// HTTP verb of a described route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl Method {
    /// Lowercase name, as used for OpenAPI path-item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
            Method::Patch => "patch",
            Method::Head => "head",
            Method::Options => "options",
            Method::Trace => "trace",
        }
    }

    pub(crate) fn filter(&self) -> MethodFilter {
        match self {
            Method::Get => MethodFilter::GET,
            Method::Post => MethodFilter::POST,
            Method::Put => MethodFilter::PUT,
            Method::Delete => MethodFilter::DELETE,
            Method::Patch => MethodFilter::PATCH,
            Method::Head => MethodFilter::HEAD,
            Method::Options => MethodFilter::OPTIONS,
            Method::Trace => MethodFilter::TRACE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// One media-type entry of a body or response content map.
#[derive(Debug, Clone)]
pub struct MediaType {
    pub schema: Schema,
    pub example: Option<Value>,
}

impl MediaType {
    pub fn new(schema: Schema) -> Self {
        Self { schema, example: None }
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }
}

impl From<Schema> for MediaType {
    fn from(schema: Schema) -> Self {
        Self::new(schema)
    }
}

/// Ordered media type → schema map. Order is declaration order and drives
/// both validation-step order and document output.
pub type ContentMap = IndexMap<String, MediaType>;

/// Request body declaration.
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content: ContentMap,
}

impl RequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// A required `application/json` body.
    pub fn json(schema: Schema) -> Self {
        Self::new().required(true).content("application/json", schema)
    }

    /// A required `application/x-www-form-urlencoded` body.
    pub fn form(schema: Schema) -> Self {
        Self::new()
            .required(true)
            .content("application/x-www-form-urlencoded", schema)
    }

    /// A required `multipart/form-data` body.
    pub fn multipart(schema: Schema) -> Self {
        Self::new().required(true).content("multipart/form-data", schema)
    }

    /// Add (or replace) one media type. Insertion order is kept.
    pub fn content(mut self, media_type: impl Into<String>, media: impl Into<MediaType>) -> Self {
        self.content.insert(media_type.into(), media.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Per-part request schemas.
///
/// `headers` and `cookies` are documented as parameters but never validated.
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    pub query: Option<Schema>,
    pub params: Option<Schema>,
    pub body: Option<RequestBody>,
    pub headers: Option<Schema>,
    pub cookies: Option<Schema>,
}

impl RequestParts {
    pub fn is_empty(&self) -> bool {
        self.query.is_none()
            && self.params.is_none()
            && self.body.is_none()
            && self.headers.is_none()
            && self.cookies.is_none()
    }
}

/// Response declaration for one status key.
#[derive(Debug, Clone)]
pub struct ResponseConfig {
    pub description: String,
    pub headers: Option<Schema>,
    pub content: ContentMap,
}

impl ResponseConfig {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            headers: None,
            content: ContentMap::new(),
        }
    }

    /// Add an `application/json` content entry.
    pub fn json(self, schema: Schema) -> Self {
        self.content("application/json", schema)
    }

    pub fn content(mut self, media_type: impl Into<String>, media: impl Into<MediaType>) -> Self {
        self.content.insert(media_type.into(), media.into());
        self
    }

    pub fn with_headers(mut self, headers: Schema) -> Self {
        self.headers = Some(headers);
        self
    }
}

/// A security requirement: scheme name → required scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// Declarative description of one route.
///
/// Built once, handed to [`create_route`], then captured by the registrar.
/// Never mutated after registration.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub method: Method,
    /// OpenAPI path template, e.g. `/users/{id}`.
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub security: Vec<SecurityRequirement>,
    pub request: Option<RequestParts>,
    /// Status key (`"200"`, `"4XX"`, `"default"`) → response.
    pub responses: IndexMap<String, ResponseConfig>,
}

impl RouteConfig {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            security: Vec::new(),
            request: None,
            responses: IndexMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn security(mut self, scheme: impl Into<String>, scopes: &[&str]) -> Self {
        let mut requirement = SecurityRequirement::new();
        requirement.insert(scheme.into(), scopes.iter().map(|s| s.to_string()).collect());
        self.security.push(requirement);
        self
    }

    pub fn query(mut self, schema: Schema) -> Self {
        self.request_mut().query = Some(schema);
        self
    }

    pub fn params(mut self, schema: Schema) -> Self {
        self.request_mut().params = Some(schema);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.request_mut().body = Some(body);
        self
    }

    pub fn headers(mut self, schema: Schema) -> Self {
        self.request_mut().headers = Some(schema);
        self
    }

    pub fn cookies(mut self, schema: Schema) -> Self {
        self.request_mut().cookies = Some(schema);
        self
    }

    /// Declare the response for a status key. `status` is anything that
    /// renders as one: `200`, `"4XX"`, `"default"`.
    pub fn response(mut self, status: impl ToString, response: ResponseConfig) -> Self {
        self.responses.insert(status.to_string(), response);
        self
    }

    fn request_mut(&mut self) -> &mut RequestParts {
        self.request.get_or_insert_with(RequestParts::default)
    }

    /// Names of the `{placeholders}` in the path template, in order.
    pub fn path_parameters(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.path.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    let name = after[..end].trim_start_matches('*');
                    if !name.is_empty() {
                        names.push(name);
                    }
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        names
    }
}

/// Identity helper for declaring a route.
///
/// Returns its argument unchanged. It exists so declaration sites read as
/// declarations and are checked against [`RouteConfig`] before the value is
/// used anywhere else.
pub fn create_route(route: RouteConfig) -> RouteConfig {
    route
}
