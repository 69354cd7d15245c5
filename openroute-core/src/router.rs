use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::content::ContentKind;
use crate::hook::{Hook, ValidationOutcome};
use crate::http::middleware::from_fn_with_state;
use crate::http::response::Response;
use crate::http::routing::{on, Handler, MethodRouter};
use crate::http::{Parts, Router};
use crate::registry::RouteRegistry;
use crate::route::RouteConfig;
use crate::schema::Schema;
use crate::step::{run_validation_step, ValidationStep};
use crate::validation::ValidationTarget;

/// An axum router that records a description of every route it serves and
/// validates each declared request part before the handler runs.
///
/// ```ignore
/// let app = OpenApiRouter::new()
///     .openapi(ping_route(), ping)
///     .openapi(create_item_route(), create_item)
///     .into_router();
/// ```
pub struct OpenApiRouter<S = ()> {
    router: Router<S>,
    registry: RouteRegistry,
}

impl<S> OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create an empty router with its own, empty registry.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            registry: RouteRegistry::new(),
        }
    }

    /// Register a described route with its handler.
    ///
    /// Records `route` in the registry, then installs `handler` at the
    /// route's method and path behind one validation step per declared
    /// request part: query, then path parameters, then each validatable
    /// body media type in declaration order.
    pub fn openapi<H, T>(self, route: RouteConfig, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(route, handler, None)
    }

    /// Like [`openapi`](Self::openapi), with a hook that sees every
    /// validation outcome first and may answer in place of the default.
    pub fn openapi_with_hook<H, T, F>(self, route: RouteConfig, handler: H, hook: F) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
        F: Fn(&ValidationOutcome<'_>, &Parts) -> Option<Response> + Send + Sync + 'static,
    {
        self.register(route, handler, Some(Hook::new(hook)))
    }

    fn register<H, T>(mut self, route: RouteConfig, handler: H, hook: Option<Hook>) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let route = Arc::new(route);
        let first = self.registry.push(Arc::clone(&route));
        let steps = build_validation_steps(&route, hook);

        debug!(
            method = %route.method,
            path = %route.path,
            steps = steps.len(),
            "registered route"
        );

        if !first {
            warn!(
                method = %route.method,
                path = %route.path,
                "duplicate route description; documented, but the first registration keeps serving"
            );
            return self;
        }

        let mut method_router: MethodRouter<S> = on(route.method.filter(), handler);
        // Layers added later wrap earlier ones, so the first step goes on last.
        for step in steps.into_iter().rev() {
            method_router = method_router.route_layer(from_fn_with_state(step, run_validation_step));
        }
        self.router = self.router.route(&route.path, method_router);
        self
    }

    /// Add an undocumented route straight to the underlying router.
    pub fn route(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        self.router = self.router.route(path, method_router);
        self
    }

    /// Register a named schema component for the generated document.
    pub fn register_schema(self, name: impl Into<String>, schema: Schema) -> Self {
        self.registry.register_schema(name, schema);
        self
    }

    /// Register a raw component (`securitySchemes`, `parameters`, ...).
    pub fn register_component(self, kind: impl Into<String>, name: impl Into<String>, component: Value) -> Self {
        self.registry.register_component(kind, name, component);
        self
    }

    /// Handle to this router's registry.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Provide the state and finish into a plain axum router.
    pub fn with_state<S2>(self, state: S) -> Router<S2> {
        self.router.with_state(state)
    }

    /// Finish into a plain axum router, still awaiting its state.
    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

impl<S> Default for OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> From<OpenApiRouter<S>> for Router<S> {
    fn from(router: OpenApiRouter<S>) -> Self {
        router.router
    }
}

/// Derive the ordered validation steps for a route.
///
/// Body media types that are neither JSON nor form, and body schemas that
/// cannot validate (raw JSON Schema), produce no step.
pub(crate) fn build_validation_steps(route: &RouteConfig, hook: Option<Hook>) -> Vec<ValidationStep> {
    let Some(request) = route.request.as_ref() else {
        return Vec::new();
    };

    let label: Arc<str> = Arc::from(format!("{} {}", route.method, route.path));
    let mut steps = Vec::new();

    let declared_bodies: Arc<[ContentKind]> = request
        .body
        .iter()
        .flat_map(|body| body.content.iter())
        .filter(|(_, media)| media.schema.is_typed())
        .map(|(media_type, _)| ContentKind::from_media_type(media_type))
        .filter(|kind| *kind != ContentKind::Unsupported)
        .collect();

    let mut push = |target: ValidationTarget, schema: &Schema| {
        if let Some(validator) = schema.validator() {
            steps.push(ValidationStep::new(
                Arc::clone(&label),
                target,
                Arc::clone(validator),
                hook.clone(),
                Arc::clone(&declared_bodies),
            ));
        }
    };

    if let Some(query) = &request.query {
        push(ValidationTarget::Query, query);
    }
    if let Some(params) = &request.params {
        push(ValidationTarget::Param, params);
    }

    if let Some(body) = &request.body {
        for (media_type, media) in &body.content {
            let target = match ContentKind::from_media_type(media_type) {
                ContentKind::Json => ValidationTarget::Json,
                ContentKind::Form => ValidationTarget::Form,
                ContentKind::Unsupported => {
                    debug!(route = %label, media_type = %media_type, "media type not validated");
                    continue;
                }
            };
            if !media.schema.is_typed() {
                debug!(route = %label, media_type = %media_type, "raw schema, body not validated");
                continue;
            }
            push(target, &media.schema);
        }
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RequestBody;
    use garde::Validate;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Validate, JsonSchema)]
    struct Anything {
        #[garde(skip)]
        #[allow(dead_code)]
        value: Option<String>,
    }

    fn targets(route: &RouteConfig) -> Vec<ValidationTarget> {
        build_validation_steps(route, None).iter().map(|s| s.target()).collect()
    }

    #[test]
    fn no_request_means_no_steps() {
        assert!(targets(&RouteConfig::get("/ping")).is_empty());
    }

    #[test]
    fn steps_follow_fixed_order() {
        let route = RouteConfig::post("/items/{id}")
            .body(RequestBody::json(Schema::of::<Anything>()))
            .params(Schema::of::<Anything>())
            .query(Schema::of::<Anything>());
        assert_eq!(
            targets(&route),
            vec![ValidationTarget::Query, ValidationTarget::Param, ValidationTarget::Json]
        );
    }

    #[test]
    fn unsupported_media_types_are_skipped() {
        let route = RouteConfig::post("/notes").body(
            RequestBody::new()
                .content("text/plain", Schema::of::<Anything>())
                .content("application/xml", Schema::of::<Anything>()),
        );
        assert!(targets(&route).is_empty());
    }

    #[test]
    fn raw_body_schemas_are_skipped() {
        let route = RouteConfig::post("/raw").body(RequestBody::json(Schema::raw(json!({ "type": "object" }))));
        assert!(targets(&route).is_empty());
    }

    #[test]
    fn json_and_form_bodies_both_get_steps() {
        let route = RouteConfig::post("/both").body(
            RequestBody::new()
                .content("multipart/form-data", Schema::of::<Anything>())
                .content("application/json; charset=utf-8", Schema::of::<Anything>())
                .content("application/x-www-form-urlencoded", Schema::of::<Anything>()),
        );
        assert_eq!(
            targets(&route),
            vec![ValidationTarget::Form, ValidationTarget::Json, ValidationTarget::Form]
        );
    }

    #[test]
    fn headers_and_cookies_are_never_validated() {
        let route = RouteConfig::get("/h")
            .headers(Schema::of::<Anything>())
            .cookies(Schema::of::<Anything>());
        assert!(targets(&route).is_empty());
    }
}
