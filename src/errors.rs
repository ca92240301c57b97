use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Upstream could not be reached (connection failure or timeout).
    UpstreamUnavailable(String),
    /// Upstream answered with a non-success HTTP status.
    UpstreamStatus {
        /// Which upstream answered.
        upstream: String,
        /// HTTP status code returned.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },
    /// Upstream payload could not be decoded or lacks required data.
    MalformedPayload(String),
    /// Upstream signalled in-band that the requested entity does not exist.
    NotFound(String),
    /// A required API credential is absent.
    MissingCredential(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            AppError::UpstreamStatus {
                upstream,
                status,
                body,
            } => write!(f, "{} returned status {}: {}", upstream, status, body),
            AppError::MalformedPayload(msg) => write!(f, "Malformed upstream payload: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::MissingCredential(name) => {
                write!(f, "{} is not configured", name)
            }
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable failure message.
    pub error: String,
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Every variant surfaces as a 500 carrying the display message; the page
    /// shell shows that message verbatim.
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamUnavailable(_) | AppError::UpstreamStatus { .. } => {
                tracing::error!("External API error: {}", self);
            }
            AppError::MalformedPayload(_) | AppError::NotFound(_) => {
                tracing::error!("Unusable upstream data: {}", self);
            }
            AppError::MissingCredential(_) => {
                tracing::error!("Configuration error: {}", self);
            }
            AppError::InternalError(_) => {
                tracing::error!("Internal error: {}", self);
            }
            AppError::WithContext { source, context } => {
                // Log full context chain for debugging
                tracing::error!("Error with context: {} -> {}", context, source);
            }
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::InternalError(format!("Invalid upstream URL: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }
}
