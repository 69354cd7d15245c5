use std::sync::Arc;

use openroute_core::http::response::{IntoResponse, Response};
use openroute_core::http::routing::get;
use openroute_core::http::Json;
use openroute_core::{OpenApiRouter, RouteRegistry};
use serde_json::Value;
use tracing::error;

use crate::builder::build_document;
use crate::{DocumentError, OpenApiConfig};

/// Document generation on an [`OpenApiRouter`].
///
/// ```ignore
/// use openroute_openapi::{OpenApiConfig, OpenApiDocExt};
///
/// let app = OpenApiRouter::new()
///     .openapi(ping_route(), ping)
///     .doc("/doc", OpenApiConfig::new("Items API", "1.0.0"));
/// ```
pub trait OpenApiDocExt: Sized {
    /// Generate the document for everything registered so far.
    fn openapi_document(&self, config: &OpenApiConfig) -> Result<Value, DocumentError>;

    /// Serve the document as JSON at `GET path`. It is regenerated on every
    /// request, so routes registered after this call still show up. The
    /// document endpoint itself is not documented.
    fn doc(self, path: &str, config: OpenApiConfig) -> Self;
}

impl<S> OpenApiDocExt for OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn openapi_document(&self, config: &OpenApiConfig) -> Result<Value, DocumentError> {
        document(self.registry(), config)
    }

    fn doc(self, path: &str, config: OpenApiConfig) -> Self {
        let registry = self.registry().clone();
        let config = Arc::new(config);
        self.route(
            path,
            get(move || {
                let registry = registry.clone();
                let config = Arc::clone(&config);
                async move { serve_document(&registry, &config) }
            }),
        )
    }
}

/// Generate the document from a registry handle.
pub fn document(registry: &RouteRegistry, config: &OpenApiConfig) -> Result<Value, DocumentError> {
    build_document(config, &registry.snapshot())
}

fn serve_document(registry: &RouteRegistry, config: &OpenApiConfig) -> Response {
    match document(registry, config) {
        Ok(doc) => Json(doc).into_response(),
        Err(err) => {
            error!(error = %err, "failed to generate OpenAPI document");
            err.into_response()
        }
    }
}
