use example_app::{build_app, build_router, build_state, DOC_PATH};
use openroute::prelude::*;
use openroute_test::TestApp;
use serde_json::{json, Value};

fn config() -> AppConfig {
    let mut config = AppConfig::empty();
    config.set("openapi.title", "Items API");
    config.set("openapi.version", "0.1.0");
    config.set("items.max-page-size", 2i64);
    config
}

fn app() -> TestApp {
    TestApp::new(build_app(&config()).unwrap())
}

#[tokio::test]
async fn ping_greets() {
    app()
        .get("/ping")
        .query("name", "ada")
        .send()
        .await
        .assert_ok()
        .assert_json_path("message", "pong, ada");
}

#[tokio::test]
async fn ping_requires_a_name() {
    app().get("/ping").send().await.assert_validation_error("query", "name");
}

#[tokio::test]
async fn create_then_fetch() {
    let app = app();
    let created: Value = app
        .post("/items")
        .json(&json!({ "name": "widget", "count": 3 }))
        .send()
        .await
        .assert_created()
        .json();
    let id = created["id"].as_u64().unwrap();

    app.get(&format!("/items/{id}"))
        .send()
        .await
        .assert_ok()
        .assert_json_path("name", "widget")
        .assert_json_path("count", 3);
}

#[tokio::test]
async fn create_accepts_forms() {
    app()
        .post("/items")
        .form(&[("name", "gadget"), ("count", "7")])
        .send()
        .await
        .assert_created()
        .assert_json_path("count", 7);
}

#[tokio::test]
async fn invalid_body_is_unprocessable() {
    app()
        .post("/items")
        .json(&json!({ "name": "", "count": -1 }))
        .send()
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_json_path("error", "Unprocessable item")
        .assert_json_path_fn("details", |d| d.as_array().is_some_and(|a| a.len() == 2));
}

#[tokio::test]
async fn list_is_capped_by_config() {
    let app = app();
    for name in ["a", "b", "c"] {
        app.post("/items")
            .json(&json!({ "name": name, "count": 1 }))
            .send()
            .await
            .assert_created();
    }
    app.get("/items").send().await.assert_ok().assert_json_path("len()", 2);
    app.get("/items")
        .query("limit", 1)
        .send()
        .await
        .assert_ok()
        .assert_json_path("[0].name", "a")
        .assert_json_path("len()", 1);
}

#[tokio::test]
async fn unknown_and_invalid_ids() {
    let app = app();
    app.get("/items/42").send().await.assert_not_found();
    app.get("/items/0").send().await.assert_validation_error("param", "id");
    app.delete("/items/42").send().await.assert_not_found();
}

#[tokio::test]
async fn delete_removes() {
    let app = app();
    app.post("/items")
        .json(&json!({ "name": "temp", "count": 0 }))
        .send()
        .await
        .assert_created();
    app.delete("/items/1").send().await.assert_status(StatusCode::NO_CONTENT);
    app.get("/items/1").send().await.assert_not_found();
}

#[tokio::test]
async fn document_describes_every_route() {
    let doc: Value = app().get(DOC_PATH).send().await.assert_ok().json();
    assert_eq!(doc["info"]["title"], "Items API");

    let paths: Vec<&str> = doc["paths"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(paths, ["/ping", "/items", "/items/{id}"]);

    let items: Vec<&str> = doc["paths"]["/items"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(items, ["get", "post"]);
    assert_eq!(doc["paths"]["/items/{id}"]["delete"]["operationId"], "deleteItem");
    assert_eq!(
        doc["paths"]["/items"]["post"]["responses"]["201"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/Item"
    );
    assert_eq!(doc["components"]["securitySchemes"]["apiKey"]["in"], "header");
}

#[test]
fn document_is_available_without_serving() {
    let router = build_router(OpenApiConfig::new("Items API", "0.1.0"));
    let doc = router.openapi_document(&OpenApiConfig::new("Items API", "0.1.0")).unwrap();
    assert!(doc["components"]["schemas"]["Item"].is_object());
    // State is only needed to serve.
    let _ = build_state(&config());
}
