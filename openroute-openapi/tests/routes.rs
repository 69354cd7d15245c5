use garde::Validate;
use openroute_core::prelude::*;
use openroute_openapi::{OpenApiConfig, OpenApiDocExt};
use openroute_test::TestApp;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, Validate, JsonSchema)]
struct Greeting {
    #[garde(length(min = 1))]
    name: String,
}

fn config() -> OpenApiConfig {
    OpenApiConfig::new("Test API", "1.0.0")
}

fn ping_route() -> RouteConfig {
    create_route(
        RouteConfig::get("/ping")
            .query(Schema::of::<Greeting>())
            .response(200, ResponseConfig::new("Pong")),
    )
}

async fn ping(ValidQuery(greeting): ValidQuery<Greeting>) -> String {
    format!("pong {}", greeting.name)
}

#[tokio::test]
async fn doc_serves_the_document() {
    let app = TestApp::from_openapi(OpenApiRouter::new().openapi(ping_route(), ping).doc("/doc", config()));

    let resp = app.get("/doc").send().await.assert_ok();
    assert_eq!(resp.header("content-type"), Some("application/json"));
    let doc: Value = resp.json();
    assert_eq!(doc["openapi"], "3.1.0");
    assert_eq!(doc["info"]["title"], "Test API");
    assert_eq!(doc["paths"]["/ping"]["get"]["parameters"][0]["name"], "name");
}

#[tokio::test]
async fn doc_endpoint_is_not_documented() {
    let app = TestApp::from_openapi(OpenApiRouter::new().openapi(ping_route(), ping).doc("/doc", config()));
    let doc: Value = app.get("/doc").send().await.assert_ok().json();
    assert!(doc["paths"].get("/doc").is_none());
}

#[tokio::test]
async fn doc_reflects_routes_registered_afterwards() {
    let router = OpenApiRouter::new()
        .doc("/doc", config())
        .openapi(ping_route(), ping)
        .openapi(RouteConfig::delete("/items/{id}"), || async { StatusCode::NO_CONTENT });
    let app = TestApp::from_openapi(router);

    let doc: Value = app.get("/doc").send().await.assert_ok().json();
    let paths: Vec<&str> = doc["paths"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(paths, ["/ping", "/items/{id}"]);
}

#[tokio::test]
async fn doc_matches_direct_generation() {
    let router = OpenApiRouter::new().openapi(ping_route(), ping);
    let direct = router.openapi_document(&config()).unwrap();

    let app = TestApp::from_openapi(router.doc("/openapi.json", config()));
    let served: Value = app.get("/openapi.json").send().await.assert_ok().json();
    assert_eq!(served, direct);
}

#[tokio::test]
async fn documented_routes_still_validate() {
    let app = TestApp::from_openapi(OpenApiRouter::new().openapi(ping_route(), ping).doc("/doc", config()));

    let resp = app.get("/ping").query("name", "ada").send().await.assert_ok();
    assert_eq!(resp.text(), "pong ada");

    app.get("/ping")
        .send()
        .await
        .assert_bad_request()
        .assert_validation_error("query", "name");
}

#[tokio::test]
async fn generation_failure_is_a_server_error() {
    let router = OpenApiRouter::new()
        .openapi(RouteConfig::get("/broken").response("teapot", ResponseConfig::new("?")), || async { "ok" })
        .doc("/doc", config());
    let app = TestApp::from_openapi(router);

    app.get("/doc")
        .send()
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_json_path("error", "invalid response key 'teapot' on GET /broken");
    // Serving routes is unaffected.
    app.get("/broken").send().await.assert_ok();
}

#[tokio::test]
async fn doc_only_answers_get() {
    let app = TestApp::from_openapi(OpenApiRouter::new().doc("/doc", config()));
    app.post("/doc")
        .json(&json!({}))
        .send()
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}
