use axum::routing::get;
use axum::Router;

async fn index() -> &'static str {
    "Hello World!"
}

pub fn routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/home/index", get(index))
}
