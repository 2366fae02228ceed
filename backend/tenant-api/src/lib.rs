//! Tenant API origin
//!
//! Issues `TenantCtx` cookies at login and serves tenant-scoped employee
//! data. Tenant identity always comes from [`edge_auth::AuthenticatedTenant`],
//! never from the request body.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::configure;
pub use state::AppState;
