//! API error boundary
//!
//! Every handler returns `Result<_, ApiError>`. Client-facing messages are
//! fixed per variant; internal failures are logged here and reduced to a
//! generic 500.

use crate::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    /// A collaborator declined the action
    #[error("{0}")]
    Rejected(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// `{ success: false, message }`
#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub message: String,
}

impl FailureEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match self {
            ApiError::Auth(auth) => return auth.into_response(),
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(err) => {
                error!(error = ?err, "Unhandled error in request handler");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(FailureEnvelope::new(message))).into_response()
    }
}

/// Fallback for routes hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
