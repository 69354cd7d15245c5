//! HTTP re-exports from axum.
//!
//! Everything the registrar and the extractors touch on the router side goes
//! through this module, so downstream crates never need a direct `axum`
//! dependency.

pub mod header;

pub mod body {
    pub use axum::body::{to_bytes, Body, Bytes};
}

pub mod extract {
    pub use axum::extract::{
        FromRequest, FromRequestParts, OptionalFromRequestParts, Query, RawPathParams, Request, State,
    };
}

pub mod middleware {
    pub use axum::middleware::{from_fn, from_fn_with_state, Next};
}

pub mod response {
    pub use axum::response::{IntoResponse, Response};
}

pub mod routing {
    pub use axum::handler::Handler;
    pub use axum::routing::{delete, get, on, patch, post, put, MethodFilter, MethodRouter};
}

pub use axum::{serve, Json, Router};
pub use self::body::Body;
pub use self::header::{
    HeaderMap, HeaderName, HeaderValue, Method, Parts, StatusCode,
    // Common header constants
    ACCEPT, CONTENT_LENGTH, CONTENT_TYPE,
};
pub use self::response::{IntoResponse, Response};
