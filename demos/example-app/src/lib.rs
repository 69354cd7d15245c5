//! Item store demo: validated routes, an OpenAPI document at `/doc`.

pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use openroute::prelude::*;

use crate::routes::*;
use crate::services::ItemStore;
use crate::state::AppState;

pub const DOC_PATH: &str = "/doc";

/// State built from the `items` config section.
pub fn build_state(config: &AppConfig) -> AppState {
    AppState {
        store: ItemStore::new(),
        max_page_size: config.get_or("items.max-page-size", 50),
    }
}

/// Register every route, then serve the document of all of them.
pub fn build_router(openapi: OpenApiConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .openapi(ping_route(), ping)
        .openapi(list_items_route(), list_items)
        .openapi(get_item_route(), get_item)
        .openapi_with_hook(create_item_route(), create_item, reject_unprocessable)
        .openapi(delete_item_route(), delete_item)
        .register_component(
            "securitySchemes",
            "apiKey",
            serde_json::json!({ "type": "apiKey", "in": "header", "name": "x-api-key" }),
        )
        .doc(DOC_PATH, openapi)
}

pub fn build_app(config: &AppConfig) -> Result<Router, ConfigError> {
    let openapi = OpenApiConfig::from_config(config, "openapi")?.with_tag("items", "Item store");
    let state = build_state(config);
    Ok(build_router(openapi)
        .with_state(state)
        .layer(default_trace())
        .layer(catch_panic_layer()))
}
