//! Session data types.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::auth::AuthType;
use crate::headers::Headers;

/// An authenticated principal as reported by the search engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub backend_roles: Vec<String>,
    /// Tenant name → whether the user may write to it.
    #[serde(default)]
    pub tenants: BTreeMap<String, bool>,
    #[serde(default)]
    pub selected_tenant: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Server-side state referenced by the session cookie.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub user: User,

    pub auth_type: AuthType,

    /// Authorization header value forwarded to the search engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Request headers captured at login, limited to the configured allow-list.
    #[serde(default)]
    pub additional_auth_headers: Headers,

    /// Expiry as milliseconds since the Unix epoch.
    pub expires_at: u64,

    /// Fields owned by other parts of the host. Never touched here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Session {
    pub fn new(user: User, auth_type: AuthType, ttl: Duration) -> Self {
        Self {
            user,
            auth_type,
            credentials: None,
            additional_auth_headers: Headers::new(),
            expires_at: expiry_after(ttl),
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= now_millis()
    }

    /// Push the expiry `ttl` into the future from now.
    pub fn extend(&mut self, ttl: Duration) {
        self.expires_at = expiry_after(ttl);
    }
}

/// Outcome of a successful identity check.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationResponse {
    pub session: Session,
    pub user: User,
}

impl AuthenticationResponse {
    pub fn new(user: User, auth_type: AuthType, ttl: Duration) -> Self {
        Self {
            session: Session::new(user.clone(), auth_type, ttl),
            user,
        }
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Saturates at `u64::MAX` rather than wrapping for very long TTLs.
fn expiry_after(ttl: Duration) -> u64 {
    let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    now_millis().saturating_add(ttl_millis)
}
