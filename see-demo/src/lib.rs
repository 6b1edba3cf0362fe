//! Member CRUD service over the See repository.
//!
//! The router is generic over the storage provider; `main` picks the provider
//! from `database.provider` and hands it to [`serve`].

pub mod config;
pub mod controllers;
pub mod models;
pub mod schema;
pub mod state;

use axum::routing::get;
use axum::Router;
use see_core::{catch_panic_layer, default_trace};
use see_data::{DataError, EntityProvider};

use crate::config::{ProviderKind, ServerConfig};
use crate::models::Member;
use crate::state::AppState;

async fn health() -> &'static str {
    "OK"
}

/// Every route of the service, with tracing and panic recovery layers.
pub fn router<P: EntityProvider<Member>>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(controllers::home_controller::routes())
        .merge(controllers::member_controller::routes::<P>())
        .merge(controllers::repository_controller::routes::<P>())
        .layer(default_trace())
        .layer(catch_panic_layer())
        .with_state(state)
}

/// Build the app for `provider`, make sure the schema exists, and serve until shutdown.
pub async fn serve<P: EntityProvider<Member>>(
    provider: P,
    kind: ProviderKind,
    server: &ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    schema::ensure_schema(&provider, kind).await?;
    let app = router(AppState::new(provider));

    let listener = tokio::net::TcpListener::bind(&server.addr).await?;
    tracing::info!(addr = %server.addr, provider = %kind, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

/// Error for a provider that was configured but compiled out.
pub fn provider_unavailable(kind: ProviderKind) -> DataError {
    DataError::Other(format!(
        "provider '{kind}' is not enabled; rebuild with the '{kind}' feature"
    ))
}
