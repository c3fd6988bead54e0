//! Groundworks Backend Library
//!
//! Staff authentication (JWT codec + role gate), the role-scoped API
//! handlers and the router that serves them. The `groundworks` binary wires
//! these to configuration and a listener.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;

pub use api::{router, AppState};
pub use error::ApiError;
