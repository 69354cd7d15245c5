//! OpenAPI 3.1 documents for routes registered on an
//! [`OpenApiRouter`](openroute_core::OpenApiRouter).

mod builder;
mod config;
mod error;
mod ext;
mod schema;

pub use builder::build_document;
pub use config::{Contact, ExternalDocs, License, OpenApiConfig, Server, Tag, DEFAULT_OPENAPI_VERSION};
pub use error::DocumentError;
pub use ext::{document, OpenApiDocExt};
