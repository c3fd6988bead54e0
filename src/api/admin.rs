//! Admin profile update
//! Mission: Validate and apply profile changes requested by an admin

use crate::api::AppState;
use crate::auth::models::{ProfileUpdate, UserRole};
use crate::error::ApiError;
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Raw body of `POST /api/admin/profile`; presence is checked after parsing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub current_email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Basic `local@domain.tld` shape: no whitespace, one `@`, and a dot inside
/// the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check the request and return `(current_email, update)`, trimmed
pub fn validate_profile_request(
    request: UpdateProfileRequest,
) -> Result<(String, ProfileUpdate), ApiError> {
    let (Some(current_email), Some(first_name), Some(last_name), Some(email)) = (
        required(request.current_email),
        required(request.first_name),
        required(request.last_name),
        required(request.email),
    ) else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok((
        current_email,
        ProfileUpdate {
            first_name,
            last_name,
            email,
        },
    ))
}

/// Update profile - POST /api/admin/profile (Admin only)
///
/// The body is parsed only after the role check so an anonymous caller
/// learns nothing about the expected shape.
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let admin = state.gate.authorize(&headers, &[UserRole::Admin])?;

    let request: UpdateProfileRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Unparseable profile update body");
        ApiError::Validation("Invalid request body".to_string())
    })?;
    let (current_email, update) = validate_profile_request(request)?;

    let updated = state
        .user_store
        .update_user_profile(&current_email, &update)
        .await?;

    if !updated {
        return Err(ApiError::Rejected("Failed to update profile".to_string()));
    }

    info!(
        admin = %admin.claims().sub,
        current_email = %current_email,
        new_email = %update.email,
        "Profile updated"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
    })))
}
