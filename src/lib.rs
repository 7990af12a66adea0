//! Session authentication service for a search-engine dashboard.
//!
//! Persists allow-listed request headers into server-side sessions, manages
//! the session cookie, and advertises the configured login mechanism.

pub mod auth;
pub mod config;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::schema::DashboardsConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
