//! Route descriptions, validation and a route registry over axum.
//!
//! A [`RouteConfig`] describes one operation: method, path, request parts
//! and responses. Registering it on an [`OpenApiRouter`] together with a
//! handler both records the description in the router's [`RouteRegistry`]
//! and installs the handler behind one validation step per declared request
//! part. The document generator in `openroute-openapi` reads the same
//! registry.

pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod hook;
pub mod http;
pub mod layers;
#[cfg(feature = "multipart")]
pub mod multipart;
pub mod prelude;
pub mod registry;
pub mod route;
pub mod router;
pub mod schema;
mod step;
pub mod validation;

pub use config::{AppConfig, ConfigError, ConfigValue, FromConfigValue};
pub use content::ContentKind;
pub use error::{error_response, HttpError};
pub use extract::{ValidForm, ValidJson, ValidParam, ValidQuery, ValidatedInputs};
pub use hook::{Hook, ValidationOutcome};
pub use layers::{catch_panic_layer, default_trace, init_tracing};
pub use registry::{RegistrySnapshot, RouteRegistry};
pub use route::{
    create_route, ContentMap, MediaType, Method, RequestBody, RequestParts, ResponseConfig,
    RouteConfig, SecurityRequirement,
};
pub use router::OpenApiRouter;
pub use schema::{Schema, SchemaValidator, ValidatedValue};
pub use step::BODY_LIMIT;
pub use validation::{FieldError, ValidationError, ValidationTarget};

pub use garde;
pub use indexmap;
pub use schemars;
