//! JWT Token Handler
//! Mission: Generate and validate signed, expiring tokens with one HMAC secret

use crate::auth::models::{Claims, TokenPayload};
use crate::auth::secret::{ConfigurationError, SecretSource};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

/// Default token lifetime
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Token signing/verification failures
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("token has expired")]
    Expired,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Per-call signing options
#[derive(Debug, Clone, Copy)]
pub struct SignOptions {
    pub expires_in: Duration,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            expires_in: Duration::hours(DEFAULT_EXPIRATION_HOURS),
        }
    }
}

impl SignOptions {
    pub fn expires_in(expires_in: Duration) -> Self {
        Self { expires_in }
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_in: i64, // seconds until expiration
}

/// JWT Handler for token operations
#[derive(Debug, Clone)]
pub struct JwtHandler {
    secret: SecretSource,
}

impl JwtHandler {
    /// Create a handler that resolves its secret from `source` on every call
    pub fn new(secret: SecretSource) -> Self {
        Self { secret }
    }

    /// Handler keyed by `JWT_SECRET`
    pub fn from_env() -> Self {
        Self::new(SecretSource::from_env())
    }

    /// Fail early if the secret cannot be resolved
    pub fn check_secret(&self) -> Result<(), ConfigurationError> {
        self.secret.resolve().map(|_| ())
    }

    /// Sign a payload; `iat` is now and `exp` is now + `options.expires_in`
    pub fn sign(
        &self,
        payload: &TokenPayload,
        options: SignOptions,
    ) -> Result<SignedToken, TokenError> {
        let secret = self.secret.resolve()?;

        let now = Utc::now();
        let expiration = now
            .checked_add_signed(options.expires_in)
            .ok_or_else(|| TokenError::Malformed("expiration out of range".to_string()))?;

        let claims = Claims {
            sub: payload.sub.clone(),
            role: payload.role,
            email: payload.email.clone(),
            name: payload.name.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!(
            sub = %claims.sub,
            role = %claims.role,
            expires_in_secs = options.expires_in.num_seconds(),
            "Signing JWT"
        );

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| TokenError::Malformed(e.to_string()))?;

        Ok(SignedToken {
            token,
            expires_in: options.expires_in.num_seconds(),
        })
    }

    /// Validate signature, required claims and expiry in a single decode
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let secret = self.secret.resolve()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        })?;

        debug!(sub = %decoded.claims.sub, role = %decoded.claims.role, "Validated JWT");

        Ok(decoded.claims)
    }

    /// `verify` without the error; any failure becomes `None`
    pub fn safe_verify(&self, token: &str) -> Option<Claims> {
        match self.verify(token) {
            Ok(claims) => Some(claims),
            Err(TokenError::Configuration(e)) => {
                tracing::error!(error = %e, "Cannot verify tokens without a signing secret");
                None
            }
            Err(e) => {
                debug!(reason = %e, "Rejected token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;

    fn handler(secret: &str) -> JwtHandler {
        JwtHandler::new(SecretSource::fixed(secret))
    }

    fn employee_payload() -> TokenPayload {
        TokenPayload::new("user-42", UserRole::Employee)
            .with_email("crew@example.com")
            .with_name("Pat Crew")
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let handler = handler("test-secret-key-12345");
        let payload = employee_payload();

        let signed = handler.sign(&payload, SignOptions::default()).unwrap();
        assert!(!signed.token.is_empty());
        assert_eq!(signed.expires_in, 24 * 3600);

        let claims = handler.verify(&signed.token).unwrap();
        assert_eq!(claims.payload(), payload);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_payload_without_optional_fields_round_trips() {
        let handler = handler("test-secret-key-12345");
        let payload = TokenPayload::new("admin-1", UserRole::Admin);

        let signed = handler.sign(&payload, SignOptions::default()).unwrap();
        let claims = handler.verify(&signed.token).unwrap();
        assert_eq!(claims.payload(), payload);
    }

    #[test]
    fn test_custom_expiry() {
        let handler = handler("test-secret-key-12345");
        let signed = handler
            .sign(
                &employee_payload(),
                SignOptions::expires_in(Duration::minutes(5)),
            )
            .unwrap();
        assert_eq!(signed.expires_in, 300);

        let claims = handler.verify(&signed.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = handler("test-secret-key-12345");

        let result = handler.verify("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = handler("secret1");
        let handler2 = handler("secret2");

        let signed = handler1
            .sign(&employee_payload(), SignOptions::default())
            .unwrap();

        let result = handler2.verify(&signed.token);
        assert!(matches!(result, Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = handler("test-secret-key-12345");
        let signed = handler
            .sign(
                &employee_payload(),
                SignOptions::expires_in(Duration::hours(-1)),
            )
            .unwrap();

        let result = handler.verify(&signed.token);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_without_role_rejected() {
        #[derive(serde::Serialize)]
        struct NoRole {
            sub: String,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoRole {
                sub: "user-42".to_string(),
                iat: now,
                exp: now + 3600,
            },
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        let result = handler("test-secret-key-12345").verify(&token);
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let handler = JwtHandler::new(SecretSource::Env(
            "GROUNDWORKS_TEST_SECRET_NEVER_SET".to_string(),
        ));

        let sign = handler.sign(&employee_payload(), SignOptions::default());
        assert!(matches!(sign, Err(TokenError::Configuration(_))));

        let verify = handler.verify("a.b.c");
        assert!(matches!(verify, Err(TokenError::Configuration(_))));
        assert!(handler.check_secret().is_err());
    }

    #[test]
    fn test_safe_verify_never_fails() {
        let handler = handler("test-secret-key-12345");

        for input in ["", " ", "abc", "a.b.c", "Bearer x", "....", "\u{0}"] {
            assert!(handler.safe_verify(input).is_none(), "input {input:?}");
        }

        let expired = handler
            .sign(
                &employee_payload(),
                SignOptions::expires_in(Duration::hours(-2)),
            )
            .unwrap();
        assert!(handler.safe_verify(&expired.token).is_none());

        let valid = handler
            .sign(&employee_payload(), SignOptions::default())
            .unwrap();
        assert_eq!(
            handler.safe_verify(&valid.token).map(|c| c.sub),
            Some("user-42".to_string())
        );
    }
}
