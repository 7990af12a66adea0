//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{AuthType, UnknownAuthType};
use crate::headers::AllowList;

/// Root configuration for the dashboards security service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DashboardsConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Authentication mode and route exemptions.
    pub auth: AuthConfig,

    /// Session lifetime and stored headers.
    pub session: SessionConfig,

    /// Session cookie attributes.
    pub cookie: CookieConfig,

    /// Search engine used for identity checks.
    pub upstream: UpstreamConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5601").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5601".to_string(),
            request_timeout_secs: 30,
            max_body_size: 64 * 1024,
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Advertised login mechanism, also recorded on every session it creates.
    /// Unset or blank means `basicauth`.
    #[serde(rename = "type")]
    pub auth_type: Option<String>,

    /// Extra routes reachable without a session.
    pub unauthenticated_routes: Vec<String>,

    /// Require every user to have at least one tenant.
    pub multitenancy_enabled: bool,
}

impl AuthConfig {
    pub fn resolved_type(&self) -> Result<AuthType, UnknownAuthType> {
        AuthType::from_config(self.auth_type.as_deref())
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session lifetime in seconds.
    pub ttl_secs: u64,

    /// Extend the session on every authenticated request.
    pub keepalive: bool,

    /// Request headers copied into the session at login.
    pub headers_to_store_in_session: Vec<String>,

    /// Interval between sweeps of expired sessions, in seconds.
    pub purge_interval_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn allow_list(&self) -> AllowList {
        AllowList::new(&self.headers_to_store_in_session)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60,
            keepalive: true,
            headers_to_store_in_session: Vec::new(),
            purge_interval_secs: 60,
        }
    }
}

/// SameSite attribute of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Cookie name.
    pub name: String,

    /// Only send the cookie over HTTPS.
    pub secure: bool,

    /// SameSite attribute.
    pub same_site: SameSitePolicy,

    /// Optional Domain attribute.
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "security_authentication".to_string(),
            secure: false,
            same_site: SameSitePolicy::Lax,
            domain: None,
        }
    }
}

/// Search engine connection used for identity checks.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the search engine.
    pub url: String,

    /// Identity check timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
