//! Authentication Module
//! Mission: Stateless JWT sessions and role-gated access for the staff API

pub mod api;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod secret;
pub mod user_store;

pub use gate::{AuthError, AuthGate, AuthorizedUser};
pub use jwt::{JwtHandler, SignOptions, SignedToken, TokenError};
pub use middleware::require_auth;
pub use models::{Claims, ProfileUpdate, TokenPayload, User, UserRole};
pub use secret::{get_secret, ConfigurationError, SecretSource};
pub use user_store::{SqliteUserStore, UserStore};
