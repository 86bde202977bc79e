use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::models::ModelError;
use crate::providers::CompletionError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Content-Type must be application/json")]
    UnsupportedContentType { received: Option<String> },

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    Model(#[from] ModelError),

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("The requested URL {0} was not found on this server")]
    NotFound(String),

    #[error("The method {method} is not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error(transparent)]
    Upstream(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedContentType { .. } | Self::BadRequest(_) | Self::Model(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream(CompletionError::MissingApiKey) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Io(_) | Self::HttpClient(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Internal failures are replaced by a
    /// generic sentence; the detail only goes to the log.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Io(_) | Self::HttpClient(_) | Self::Config(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    received: Option<Option<String>>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }

        let message = self.public_message();
        let received = match self {
            Self::UnsupportedContentType { received } => Some(received),
            _ => None,
        };

        (
            status,
            Json(ErrorEnvelope {
                status: "error",
                message,
                received,
            }),
        )
            .into_response()
    }
}
