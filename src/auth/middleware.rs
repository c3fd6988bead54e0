//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::auth::{
    gate::{AuthError, AuthGate},
    models::Claims,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Validates the bearer token for any role and stores the claims in the
/// request extensions for downstream handlers
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = gate.authorize(req.headers(), &[])?;

    req.extensions_mut().insert(user.0);

    Ok(next.run(req).await)
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}
