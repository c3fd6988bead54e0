//! Authentication API Endpoints
//! Mission: Let a signed-in user inspect the session carried by their token

use crate::auth::{middleware::extract_claims, models::UserRole};
use crate::error::ApiError;
use axum::{extract::Request, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Session details echoed back from the token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub success: bool,
    pub user: SessionUser,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
}

/// Format a token timestamp for clients
pub fn rfc3339(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Get current user info - GET /api/auth/me
/// Built from the JWT claims placed by `require_auth` (no database lookup)
pub async fn get_current_user(req: Request) -> Result<Json<MeResponse>, ApiError> {
    let claims = extract_claims(&req).ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!("require_auth did not run for /api/auth/me"))
    })?;

    Ok(Json(MeResponse {
        success: true,
        user: SessionUser {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            role: claims.role,
        },
        expires_at: rfc3339(claims.exp),
    }))
}
