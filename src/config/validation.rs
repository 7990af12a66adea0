//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject allow-list entries that can never match a header
//! - Validate value ranges (ttl > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::{DashboardsConfig, SameSitePolicy};
use crate::headers::normalize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("auth.type: unknown auth type '{0}'")]
    UnknownAuthType(String),

    #[error("session.headers_to_store_in_session[{0}]: entry is blank")]
    BlankHeaderName(usize),

    #[error("session.headers_to_store_in_session[{index}]: '{name}' is not a valid header name")]
    InvalidHeaderName { index: usize, name: String },

    #[error("session.ttl_secs must be greater than zero")]
    ZeroSessionTtl,

    #[error("session.purge_interval_secs must be greater than zero")]
    ZeroPurgeInterval,

    #[error("cookie.name must not be empty")]
    EmptyCookieName,

    #[error("cookie.same_site = None requires cookie.secure = true")]
    InsecureSameSiteNone,

    #[error("server.bind_address: '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address: '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("upstream.url: '{0}' is not an absolute http(s) URL")]
    InvalidUpstreamUrl(String),

    #[error("auth.unauthenticated_routes: '{0}' must start with '/'")]
    RelativeRoute(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DashboardsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.auth.resolved_type() {
        errors.push(ValidationError::UnknownAuthType(e.0));
    }

    for route in &config.auth.unauthenticated_routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::RelativeRoute(route.clone()));
        }
    }

    let mut seen = HashSet::new();
    for (index, name) in config.session.headers_to_store_in_session.iter().enumerate() {
        let key = normalize(name);
        if key.is_empty() {
            errors.push(ValidationError::BlankHeaderName(index));
        } else if HeaderName::from_bytes(key.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                index,
                name: name.clone(),
            });
        } else if !seen.insert(key) {
            tracing::debug!(header = %name, "Duplicate entry in headers_to_store_in_session");
        }
    }

    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::ZeroSessionTtl);
    }
    if config.session.purge_interval_secs == 0 {
        errors.push(ValidationError::ZeroPurgeInterval);
    }

    if config.cookie.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCookieName);
    }
    if config.cookie.same_site == SameSitePolicy::None && !config.cookie.secure {
        errors.push(ValidationError::InsecureSameSiteNone);
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.server.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    match url::Url::parse(&config.upstream.url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUpstreamUrl(config.upstream.url.clone())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
