use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::error::error_response;
use crate::http::response::Response;
use crate::http::StatusCode;

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Install the global `fmt` subscriber, filtered by `RUST_LOG` or
/// [`DEFAULT_LOG_FILTER`]. Call once, first thing in `main`.
///
/// A second call (or a subscriber installed elsewhere) is left in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Request/response tracing at `DEBUG`, server errors reported as failures.
pub fn default_trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Turn handler panics into a JSON `500` instead of a dropped connection.
pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn std::any::Any + Send>) -> Response> {
    CatchPanicLayer::custom(panic_response as fn(_) -> _)
}

fn panic_response(_err: Box<dyn std::any::Any + Send>) -> Response {
    tracing::error!("handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
