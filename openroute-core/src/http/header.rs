pub use axum::http::header::{
    HeaderName, HeaderValue,
    // Common header constants
    ACCEPT, CONTENT_LENGTH, CONTENT_TYPE,
};
pub use axum::http::request::Parts;
pub use axum::http::{HeaderMap, Method, Request as HttpRequest, StatusCode};
