//! Public endpoints (no token required)

use crate::error::ApiError;
use axum::Json;
use serde_json::{json, Value};

/// Liveness probe - GET /health
pub async fn health_check() -> &'static str {
    "Groundworks backend operational"
}

/// AI assistant placeholder - POST /api/ai
pub async fn ai_placeholder() -> Result<Json<Value>, ApiError> {
    Ok(Json(json!({
        "success": true,
        "message": "AI assistant coming soon",
    })))
}
