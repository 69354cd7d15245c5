use garde::Validate;
use openroute_core::prelude::*;
use openroute_test::TestApp;
use serde_json::json;

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
struct Search {
    #[garde(length(min = 1))]
    q: String,
    #[garde(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
struct Signup {
    #[garde(contains("@"))]
    email: String,
}

fn app() -> TestApp {
    TestApp::from_openapi(
        OpenApiRouter::new()
            .openapi(
                RouteConfig::get("/search").query(Schema::of::<Search>()),
                |ValidQuery(s): ValidQuery<Search>| async move { Json(json!({ "q": s.q, "limit": s.limit })) },
            )
            .openapi(
                RouteConfig::post("/signup").body(
                    RequestBody::json(Schema::of::<Signup>())
                        .content("application/x-www-form-urlencoded", Schema::of::<Signup>())
                        .content("multipart/form-data", Schema::of::<Signup>()),
                ),
                |json: Option<ValidJson<Signup>>, form: Option<ValidForm<Signup>>| async move {
                    let email = json.map(|j| j.0.email).or(form.map(|f| f.0.email)).unwrap_or_default();
                    (StatusCode::CREATED, Json(json!({ "email": email })))
                },
            ),
    )
}

#[tokio::test]
async fn query_pairs_are_encoded() {
    app()
        .get("/search")
        .query("q", "rust & axum")
        .query("limit", 5)
        .send()
        .await
        .assert_ok()
        .assert_json_path("q", "rust & axum")
        .assert_json_path("limit", 5);
}

#[tokio::test]
async fn validation_errors_are_asserted_by_target_and_field() {
    app()
        .get("/search?q=x&limit=500")
        .send()
        .await
        .assert_validation_error("query", "limit");
}

#[tokio::test]
async fn json_form_and_multipart_bodies() {
    let app = app();
    app.post("/signup")
        .json(&json!({ "email": "a@example.com" }))
        .send()
        .await
        .assert_created()
        .assert_json_path("email", "a@example.com");

    app.post("/signup")
        .form(&[("email", "b@example.com")])
        .send()
        .await
        .assert_created()
        .assert_json_path("email", "b@example.com");

    app.post("/signup")
        .multipart(&[("email", "c@example.com")])
        .send()
        .await
        .assert_created()
        .assert_json_path("email", "c@example.com");

    app.post("/signup")
        .form(&[("email", "nope")])
        .send()
        .await
        .assert_validation_error("form", "email");
}

#[tokio::test]
async fn headers_and_text() {
    let resp = app().get("/nowhere").header("x-trace", "1").send().await.assert_not_found();
    assert!(resp.text().is_empty());
    assert_eq!(resp.header("content-type"), None);
}
