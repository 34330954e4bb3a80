use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use thiserror::Error;
use tracing::error;

use crate::core::{
    app_config::ConfigError,
    http::error_envelope::{ErrorDetail, ErrorEnvelope},
};

/// Public application error type.
///
/// Request-time variants render as the `{"errors": [...]}` envelope; every
/// 5xx collapses to the same generic body and only the log keeps the cause.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialise {component}: {reason}")]
    Init {
        component: &'static str,
        reason: String,
    },

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// Request body failed validation (422).
    #[error("validation failed: {0:?}")]
    Validation(Vec<ErrorDetail>),

    /// Bad or missing credentials (401). No route requires auth today.
    #[error("unauthorized: {msg}")]
    Unauthorized { token: Option<String>, msg: String },

    /// The chat chain failed (500).
    #[error(transparent)]
    Chat(#[from] ContextorError),

    /// A handler panicked (500).
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Config(_)
            | AppError::Init { .. }
            | AppError::Bind { .. }
            | AppError::Server(_)
            | AppError::Chat(_)
            | AppError::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let errors = match self {
            AppError::Validation(details) => details,
            AppError::Unauthorized { token, msg } => vec![ErrorDetail::auth(token, msg)],
            other => {
                error!(error = %other, "request failed");
                vec![ErrorDetail::server()]
            }
        };
        (status, Json(ErrorEnvelope { errors })).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
