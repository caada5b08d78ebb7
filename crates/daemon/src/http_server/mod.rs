use axum::extract::DefaultBodyLimit;
use axum::Router;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderName, Method};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod config;
mod handlers;
mod health;

pub use config::Config;

use crate::ServiceState;

const RESOURCE_PREFIX: &str = "/r";
const STATUS_PREFIX: &str = "/_status";

/// Maximum resource content size in bytes (10 MB)
pub const MAX_CONTENT_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Build the full application router: /_status + /r routes.
pub fn router(state: ServiceState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::PUT])
        .allow_headers(vec![
            ACCEPT,
            ORIGIN,
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("public-access"),
        ])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(RESOURCE_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_CONTENT_SIZE_BYTES))
        .layer(cors_layer)
        .with_state(state)
}

/// Run the API HTTP server until the shutdown channel fires.
pub async fn run_api(
    config: Config,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
