//! Signing Secret
//! Mission: Resolve the shared HMAC secret on every use, never from a stale copy

use std::env;
use thiserror::Error;

/// Environment variable holding the shared signing secret
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";

/// The signing secret is missing from process configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("signing secret is not configured (set {var})")]
pub struct ConfigurationError {
    pub var: String,
}

/// Where the codec looks up its secret.
///
/// `Env` is read through on every call so a changed environment is picked up
/// by the next sign/verify. `Fixed` pins a value for embedding and tests.
#[derive(Clone)]
pub enum SecretSource {
    Env(String),
    Fixed(String),
}

impl SecretSource {
    /// Read `JWT_SECRET` from the environment
    pub fn from_env() -> Self {
        SecretSource::Env(JWT_SECRET_VAR.to_string())
    }

    pub fn fixed(secret: impl Into<String>) -> Self {
        SecretSource::Fixed(secret.into())
    }

    /// Look up the secret. Blank values count as missing.
    pub fn resolve(&self) -> Result<String, ConfigurationError> {
        let (var, value) = match self {
            SecretSource::Env(var) => (var.as_str(), env::var(var).ok()),
            SecretSource::Fixed(secret) => ("<fixed>", Some(secret.clone())),
        };

        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigurationError {
                var: var.to_string(),
            })
    }
}

// Never print the secret itself.
impl std::fmt::Debug for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::Env(var) => f.debug_tuple("Env").field(var).finish(),
            SecretSource::Fixed(_) => f.write_str("Fixed([REDACTED])"),
        }
    }
}

/// Read the process-wide secret from `JWT_SECRET`
pub fn get_secret() -> Result<String, ConfigurationError> {
    SecretSource::from_env().resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_secret_resolves() {
        let source = SecretSource::fixed("s3cret");
        assert_eq!(source.resolve().unwrap(), "s3cret");
    }

    #[test]
    fn test_blank_secret_is_configuration_error() {
        let source = SecretSource::fixed("   ");
        assert!(source.resolve().is_err());
    }

    #[test]
    fn test_env_secret_is_read_through() {
        // Unique variable so parallel tests don't race on JWT_SECRET
        let var = "GROUNDWORKS_TEST_SECRET_READ_THROUGH";
        let source = SecretSource::Env(var.to_string());

        env::remove_var(var);
        let err = source.resolve().unwrap_err();
        assert_eq!(err.var, var);

        env::set_var(var, "first");
        assert_eq!(source.resolve().unwrap(), "first");

        env::set_var(var, "second");
        assert_eq!(source.resolve().unwrap(), "second");

        env::remove_var(var);
    }

    #[test]
    fn test_get_secret_reads_jwt_secret() {
        let expected = env::var(JWT_SECRET_VAR)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false);
        assert_eq!(get_secret().is_ok(), expected);
    }

    #[test]
    fn test_debug_redacts_fixed_secret() {
        let rendered = format!("{:?}", SecretSource::fixed("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
