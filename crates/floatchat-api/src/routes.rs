//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression,
//! and the chat endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use floatchat_core::{FloatChatConfig, FloatChatError};

use crate::handlers;
use crate::state::AppState;

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS: the chat UI is served from localhost on the API port or the
    // dev server one above it.
    let port = state.config.general.port;
    let dev_port = port.saturating_add(1);
    let origins: Vec<HeaderValue> = [port, dev_port]
        .iter()
        .flat_map(|p| {
            [
                format!("http://127.0.0.1:{}", p),
                format!("http://localhost:{}", p),
            ]
        })
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat/prompts", get(handlers::list_prompts))
        .route("/chat/sessions", post(handlers::create_session))
        .route(
            "/chat/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/chat/sessions/{id}/messages",
            get(handlers::get_transcript).post(handlers::submit_message),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured bind address and port.
pub async fn start_server(config: &FloatChatConfig, state: AppState) -> Result<(), FloatChatError> {
    let addr = format!("{}:{}", config.general.bind, config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FloatChatError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FloatChatError::Server(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
