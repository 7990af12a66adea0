//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration problems surface here, never per request

use std::sync::Arc;

use crate::auth::{AuthError, UpstreamAuthenticator};
use crate::config::{ConfigError, DashboardsConfig, ValidationError};
use crate::http::{AppState, HttpServer};
use crate::session::MemorySessionStore;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("authenticator setup failed: {0}")]
    Authenticator(#[from] AuthError),
}

/// Build the production server: upstream identity checks and an in-process
/// session store.
pub fn build_server(config: DashboardsConfig) -> Result<HttpServer, StartupError> {
    let auth_type = config
        .auth
        .resolved_type()
        .map_err(|e| ConfigError::Validation(vec![ValidationError::UnknownAuthType(e.0)]))?;
    let authenticator = UpstreamAuthenticator::new(&config.upstream)?.with_auth_type(auth_type);
    let sessions = Arc::new(MemorySessionStore::new());
    let state = AppState::new(config, Arc::new(authenticator), sessions)?;

    tracing::info!(
        auth_type = %state.auth_type,
        stored_headers = state.config.session.headers_to_store_in_session.len(),
        session_ttl_secs = state.config.session.ttl_secs,
        "Configuration loaded"
    );

    Ok(HttpServer::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_server_with_defaults() {
        let server = build_server(DashboardsConfig::default()).unwrap();
        assert_eq!(server.config().cookie.name, "security_authentication");
    }

    #[test]
    fn test_unknown_auth_type_is_fatal() {
        let mut config = DashboardsConfig::default();
        config.auth.auth_type = Some("ldap".into());
        assert!(matches!(build_server(config), Err(StartupError::Config(_))));
    }
}
