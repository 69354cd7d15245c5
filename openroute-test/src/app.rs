use http::header::{HeaderMap, HeaderValue, IntoHeaderName, CONTENT_TYPE};
use http::{Method, Request};
use http_body_util::BodyExt;
use openroute_core::http::body::Body;
use openroute_core::http::Router;
use openroute_core::OpenApiRouter;
use serde::Serialize;
use tower::util::ServiceExt;

use crate::response::TestResponse;

/// In-process HTTP test client wrapping an axum `Router`.
///
/// Requests go through `tower::ServiceExt::oneshot`; nothing binds a port.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Finish a stateless [`OpenApiRouter`] and wrap it.
    pub fn from_openapi(router: OpenApiRouter) -> Self {
        Self::new(router.into_router())
    }

    pub fn get(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, path)
    }

    pub fn request(&self, method: Method, path: &str) -> TestRequest<'_> {
        TestRequest {
            app: self,
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// A request being built; [`send`](Self::send) dispatches it.
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl TestRequest<'_> {
    /// Add a header, replacing any previous value.
    pub fn header(mut self, name: impl IntoHeaderName, value: impl AsRef<str>) -> Self {
        let value = HeaderValue::from_str(value.as_ref()).expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    /// Append one encoded query pair.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// JSON body with `Content-Type: application/json`.
    pub fn json(self, body: &impl Serialize) -> Self {
        let bytes = serde_json::to_vec(body).expect("failed to serialize JSON body");
        self.body(bytes).header(CONTENT_TYPE, "application/json")
    }

    /// Urlencoded form body built from `pairs`.
    pub fn form(self, pairs: &[(&str, &str)]) -> Self {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.body(encoded).header(CONTENT_TYPE, "application/x-www-form-urlencoded")
    }

    /// `multipart/form-data` body with one text part per pair.
    pub fn multipart(self, fields: &[(&str, &str)]) -> Self {
        const BOUNDARY: &str = "openroute-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        self.body(body)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    }

    /// Raw body; set the content type separately.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub async fn send(self) -> TestResponse {
        let uri = if self.query.is_empty() {
            self.path
        } else {
            let sep = if self.path.contains('?') { '&' } else { '?' };
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            format!("{}{sep}{query}", self.path)
        };

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri)
            .body(self.body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("failed to build request");
        *request.headers_mut() = self.headers;

        let response = self
            .app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router failed to respond");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();

        TestResponse { status, headers, body }
    }
}
