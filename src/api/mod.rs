//! HTTP API
//! Mission: Public site endpoints plus role-scoped staff endpoints

pub mod admin;
pub mod employee;
pub mod public;
pub mod routes;

pub use routes::{router, AppState};
