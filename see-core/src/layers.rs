use axum::http::StatusCode;
use axum::response::IntoResponse;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Initialise the global `tracing` subscriber with a standard `fmt` layer.
///
/// Respects `RUST_LOG`, falling back to `info,tower_http=debug`. Calling it a
/// second time (e.g. from several tests) is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// `TraceLayer` for HTTP request/response spans.
pub fn default_trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Converts handler panics into JSON 500 responses.
pub fn catch_panic_layer(
) -> CatchPanicLayer<fn(Box<dyn std::any::Any + Send>) -> axum::response::Response> {
    CatchPanicLayer::custom(panic_handler as fn(_) -> _)
}

fn panic_handler(err: Box<dyn std::any::Any + Send>) -> axum::response::Response {
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "handler panicked");
    let body = serde_json::json!({ "error": "Internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
