//! In-process HTTP client for testing routers built with `openroute`.
//!
//! ```ignore
//! let app = TestApp::new(router);
//! app.post("/items")
//!     .json(&json!({ "count": "x" }))
//!     .send()
//!     .await
//!     .assert_validation_error("json", "count");
//! ```

mod app;
mod json_path;
mod response;

pub use app::{TestApp, TestRequest};
pub use json_path::{resolve_path, tokenize_path, PathToken};
pub use response::TestResponse;
