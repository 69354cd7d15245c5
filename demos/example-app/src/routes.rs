//! Route declarations and their handlers.

use openroute::prelude::*;
use serde_json::json;
use tracing::info;

use crate::models::{Item, ItemPath, ListQuery, NewItem, PingQuery};
use crate::state::AppState;

fn item_schema() -> Schema {
    Schema::of::<Item>().with_ref("Item")
}

pub fn ping_route() -> RouteConfig {
    create_route(
        RouteConfig::get("/ping")
            .operation_id("ping")
            .summary("Liveness check")
            .tag("system")
            .query(Schema::of::<PingQuery>())
            .response(200, ResponseConfig::new("Greeting")),
    )
}

pub async fn ping(ValidQuery(query): ValidQuery<PingQuery>) -> Json<serde_json::Value> {
    Json(json!({ "message": format!("pong, {}", query.name) }))
}

pub fn list_items_route() -> RouteConfig {
    create_route(
        RouteConfig::get("/items")
            .operation_id("listItems")
            .tag("items")
            .query(Schema::of::<ListQuery>())
            .response(
                200,
                ResponseConfig::new("Stored items, oldest first")
                    .json(Schema::raw(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Item" } }))),
            ),
    )
}

pub async fn list_items(State(state): State<AppState>, ValidQuery(query): ValidQuery<ListQuery>) -> Json<Vec<Item>> {
    let limit = query.limit.unwrap_or(state.max_page_size).min(state.max_page_size);
    Json(state.store.list(limit).await)
}

pub fn get_item_route() -> RouteConfig {
    create_route(
        RouteConfig::get("/items/{id}")
            .operation_id("getItem")
            .tag("items")
            .params(Schema::of::<ItemPath>())
            .response(200, ResponseConfig::new("The item").json(item_schema()))
            .response(404, ResponseConfig::new("No such item")),
    )
}

pub async fn get_item(State(state): State<AppState>, ValidParam(path): ValidParam<ItemPath>) -> Result<Json<Item>, HttpError> {
    state
        .store
        .get(path.id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::NotFound(format!("item {} not found", path.id)))
}

pub fn create_item_route() -> RouteConfig {
    create_route(
        RouteConfig::post("/items")
            .operation_id("createItem")
            .tag("items")
            .body(
                RequestBody::json(Schema::of::<NewItem>())
                    .content("application/x-www-form-urlencoded", Schema::of::<NewItem>())
                    .with_description("Item to store"),
            )
            .response(201, ResponseConfig::new("Stored").json(item_schema()))
            .response(422, ResponseConfig::new("Rejected item")),
    )
}

pub async fn create_item(
    State(state): State<AppState>,
    json: Option<ValidJson<NewItem>>,
    form: Option<ValidForm<NewItem>>,
) -> Result<(StatusCode, Json<Item>), HttpError> {
    let new = match (json, form) {
        (Some(ValidJson(new)), _) | (None, Some(ValidForm(new))) => new,
        (None, None) => return Err(HttpError::BadRequest("missing item body".into())),
    };
    let item = state.store.create(new).await;
    info!(id = item.id, name = %item.name, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Body failures on item creation answer `422` with the field list.
pub fn reject_unprocessable(outcome: &ValidationOutcome<'_>, _parts: &Parts) -> Option<Response> {
    let error = outcome.error()?;
    if !error.target.is_body() {
        return None;
    }
    let body = json!({ "error": "Unprocessable item", "details": error.errors });
    Some((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
}

pub fn delete_item_route() -> RouteConfig {
    create_route(
        RouteConfig::delete("/items/{id}")
            .operation_id("deleteItem")
            .tag("items")
            .params(Schema::of::<ItemPath>())
            .response(204, ResponseConfig::new("Deleted"))
            .response(404, ResponseConfig::new("No such item")),
    )
}

pub async fn delete_item(State(state): State<AppState>, ValidParam(path): ValidParam<ItemPath>) -> Result<StatusCode, HttpError> {
    if state.store.delete(path.id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HttpError::NotFound(format!("item {} not found", path.id)))
    }
}
