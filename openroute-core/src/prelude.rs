//! Everything a service needs to describe, register and serve routes.
//!
//! ```ignore
//! use openroute_core::prelude::*;
//!
//! let ping = create_route(
//!     RouteConfig::get("/ping").response(200, ResponseConfig::new("pong")),
//! );
//! let app = OpenApiRouter::new().openapi(ping, || async { "pong" });
//! ```

pub use crate::config::{AppConfig, ConfigError, ConfigValue, FromConfigValue};
pub use crate::error::{error_response, HttpError};
pub use crate::extract::{ValidForm, ValidJson, ValidParam, ValidQuery, ValidatedInputs};
pub use crate::hook::{Hook, ValidationOutcome};
pub use crate::layers::{catch_panic_layer, default_trace, init_tracing};
pub use crate::registry::RouteRegistry;
pub use crate::route::{
    create_route, MediaType, Method, RequestBody, RequestParts, ResponseConfig, RouteConfig,
};
pub use crate::router::OpenApiRouter;
pub use crate::schema::Schema;
pub use crate::validation::{FieldError, Validate, ValidationError, ValidationTarget};

pub use crate::http::{HeaderMap, Json, Parts, Router, StatusCode};
pub use crate::http::extract::{Query, State};
pub use crate::http::response::{IntoResponse, Response};

pub use schemars::JsonSchema;
pub use serde::{Deserialize, Serialize};
