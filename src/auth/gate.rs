//! Auth Gate
//! Mission: Turn a bearer token into an authorized user, or refuse the request

use crate::auth::{jwt::JwtHandler, models::Claims, models::UserRole};
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Claims of a request that passed the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser(pub Claims);

impl AuthorizedUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }
}

/// Gate refusals
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("role {actual} may not access this resource")]
    Forbidden { actual: UserRole },
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    fn client_message(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated(message) => message,
            AuthError::Forbidden { .. } => "Insufficient permissions",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({ "success": false, "message": self.client_message() })),
        )
            .into_response()
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .filter(|token| !token.is_empty())
}

/// Per-request role check backed by the token codec
#[derive(Debug, Clone)]
pub struct AuthGate {
    jwt: Arc<JwtHandler>,
}

impl AuthGate {
    pub fn new(jwt: Arc<JwtHandler>) -> Self {
        Self { jwt }
    }

    pub fn jwt(&self) -> &JwtHandler {
        &self.jwt
    }

    /// Authenticate the request and require its role to be one of `allowed`.
    ///
    /// An empty `allowed` set admits any recognized role. A correctly signed
    /// token carrying an unrecognized role is refused as forbidden.
    pub fn authorize(
        &self,
        headers: &HeaderMap,
        allowed: &[UserRole],
    ) -> Result<AuthorizedUser, AuthError> {
        let token = bearer_token(headers)
            .ok_or(AuthError::Unauthenticated("Missing authorization token"))?;

        let claims = self
            .jwt
            .safe_verify(&token)
            .ok_or(AuthError::Unauthenticated("Invalid or expired token"))?;

        let permitted = if allowed.is_empty() {
            claims.role != UserRole::Unknown
        } else {
            allowed.contains(&claims.role)
        };

        if !permitted {
            debug!(
                sub = %claims.sub,
                role = %claims.role,
                ?allowed,
                "Role not permitted"
            );
            return Err(AuthError::Forbidden {
                actual: claims.role,
            });
        }

        Ok(AuthorizedUser(claims))
    }
}
