//! Authentication Models
//! Mission: Define the typed token payload, roles and user records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[serde(rename = "employee")]
    Employee, // Staff dashboard
    #[serde(rename = "admin")]
    Admin, // Profile management
    /// Any role this service does not grant access to; never matches a gate
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Admin => "admin",
            UserRole::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Some(UserRole::Employee),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::parse(s).ok_or_else(|| format!("unknown role '{s}' (expected employee or admin)"))
    }
}

/// What the caller asks the codec to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub sub: String,
    pub role: UserRole,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl TokenPayload {
    pub fn new(sub: impl Into<String>, role: UserRole) -> Self {
        Self {
            sub: sub.into(),
            role,
            email: None,
            name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// JWT Claims payload
///
/// `sub`, `role`, `iat` and `exp` are required; a token without any of them
/// fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iat: i64, // issued-at, seconds since epoch
    pub exp: i64, // expiration, seconds since epoch
}

impl Claims {
    /// The caller-supplied part, without the codec's timestamps
    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            sub: self.sub.clone(),
            role: self.role,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

/// User account as kept by the user store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: String,
}

impl User {
    /// Payload for a token issued to this user
    pub fn token_payload(&self) -> TokenPayload {
        TokenPayload::new(self.id.to_string(), self.role)
            .with_email(self.email.clone())
            .with_name(format!("{} {}", self.first_name, self.last_name))
    }
}

/// Fields written by a profile update, already trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        let admin = UserRole::Admin;
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""admin""#);

        let employee: UserRole = serde_json::from_str(r#""employee""#).unwrap();
        assert_eq!(employee, UserRole::Employee);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Employee.as_str(), "employee");

        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!("employee".parse::<UserRole>(), Ok(UserRole::Employee));
        assert!("customer".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_claims_require_role() {
        let json = r#"{"sub":"u1","iat":1,"exp":2}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());

        let json = r#"{"sub":"u1","role":"employee","iat":1,"exp":2}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role, UserRole::Employee);
        assert_eq!(claims.email, None);
    }

    #[test]
    fn test_unrecognized_role_decodes_as_unknown() {
        let json = r#"{"sub":"u1","role":"manager","iat":1,"exp":2}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role, UserRole::Unknown);

        // Not assignable from the CLI or the user table
        assert_eq!(UserRole::parse("unknown"), None);
    }

    #[test]
    fn test_user_token_payload() {
        let user = User {
            id: Uuid::new_v4(),
            email: "sam@example.com".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Reed".to_string(),
            role: UserRole::Employee,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let payload = user.token_payload();
        assert_eq!(payload.sub, user.id.to_string());
        assert_eq!(payload.email.as_deref(), Some("sam@example.com"));
        assert_eq!(payload.name.as_deref(), Some("Sam Reed"));
    }
}
