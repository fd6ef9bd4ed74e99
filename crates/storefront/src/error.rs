//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! Every error body is JSON with a `message` field. Server errors add an
//! `error` field carrying the underlying cause.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use urban_threadz_core::CartError;
use urban_threadz_core::catalog::VariationError;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product store operation failed.
    #[error("{message}: {source}")]
    Repository {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Cart change rejected.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed request that fails validation.
    #[error("{0}")]
    Validation(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a store error with the message shown to the client.
    ///
    /// ```rust,ignore
    /// store.list_with_reviews().await.map_err(AppError::store("Failed to fetch products"))?;
    /// ```
    pub fn store(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Repository { message, source }
    }

    /// Unknown product id.
    #[must_use]
    pub fn product_not_found() -> Self {
        Self::NotFound("Product not found".to_string())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Repository { .. } | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Cart(CartError::OutOfStock) => StatusCode::CONFLICT,
            Self::Cart(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(source: RepositoryError) -> Self {
        Self::Repository {
            message: "Failed to read catalog",
            source,
        }
    }
}

impl From<VariationError> for AppError {
    fn from(err: VariationError) -> Self {
        Self::Cart(CartError::Variation(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match &self {
            Self::Repository { message, source } => {
                json!({ "message": message, "error": source.to_string() })
            }
            Self::Session(err) => json!({ "message": "Session error", "error": err.to_string() }),
            Self::Internal(err) => json!({ "message": "Server error", "error": err }),
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
