//! HTTP layer: a single `POST /api/chat` route over the retrieval-QA chain.

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::{future::IntoFuture, sync::Arc};

use axum::{Router, routing::post};
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn};

pub use crate::core::app_config::{
    AppConfig, ConfigError, ConfigSource, CorsConfig, LogFormat, LoggingConfig, ServerConfig,
};
pub use crate::core::app_state::AppState;
pub use crate::core::telemetry;
pub use crate::error_handler::AppError;

use crate::middleware_layer::{catch_panic::handle_panic, cors::build_cors_layer};
use crate::routes::chat::chat_route::chat_route;

/// Build the application router.
pub fn router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/api/chat", post(chat_route))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors))
}

/// Wire the state, bind and serve until SIGINT/SIGTERM.
///
/// On a signal the process stops immediately; in-flight requests are not
/// drained.
pub async fn start(cfg: AppConfig) -> Result<(), AppError> {
    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = router(state, &cfg.cors);

    let addr = cfg.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(
        %addr,
        collection = %cfg.rag.qdrant.collection,
        chat_model = %cfg.llm.chat.model,
        "listening"
    );

    tokio::select! {
        res = axum::serve(listener, app).into_future() => res.map_err(AppError::Server)?,
        sig = shutdown_signal() => warn!(signal = sig, "received signal, shutting down"),
    }

    Ok(())
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                error!(error = %e, "failed to listen for SIGINT");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        s = ctrl_c => s,
        s = terminate => s,
    }
}
