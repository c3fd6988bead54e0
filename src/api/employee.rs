//! Employee dashboard
//! Mission: Read-only session summary for staff with the employee role

use crate::api::AppState;
use crate::auth::{
    api::{rfc3339, SessionUser},
    models::UserRole,
};
use crate::error::ApiError;
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
    pub session: SessionWindow,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    pub issued_at: String,
    pub expires_at: String,
}

/// Employee dashboard - GET /api/employee/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, ApiError> {
    let user = state.gate.authorize(&headers, &[UserRole::Employee])?;
    let claims = user.claims();

    info!(sub = %claims.sub, "Employee dashboard served");

    let greeting = claims.name.as_deref().unwrap_or("team member");

    Ok(Json(DashboardResponse {
        success: true,
        message: format!("Welcome back, {greeting}"),
        user: SessionUser {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            role: claims.role,
        },
        session: SessionWindow {
            issued_at: rfc3339(claims.iat),
            expires_at: rfc3339(claims.exp),
        },
    }))
}
