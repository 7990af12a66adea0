//! Identity check against the search engine's security plugin.

use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::auth::authenticator::{Authenticator, Credentials};
use crate::auth::types::{AuthError, AuthType};
use crate::config::UpstreamConfig;
use crate::session::model::{AuthenticationResponse, User};

const AUTHINFO_PATH: &str = "_plugins/_security/authinfo";

/// Body of the security plugin's authinfo API.
#[derive(Debug, Deserialize)]
struct AuthInfo {
    user_name: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    backend_roles: Vec<String>,
    #[serde(default)]
    tenants: BTreeMap<String, bool>,
    #[serde(default)]
    user_requested_tenant: Option<String>,
}

impl From<AuthInfo> for User {
    fn from(info: AuthInfo) -> Self {
        User {
            username: info.user_name,
            roles: info.roles,
            backend_roles: info.backend_roles,
            tenants: info.tenants,
            selected_tenant: info.user_requested_tenant,
        }
    }
}

/// Validates basic-auth credentials by asking the search engine who they
/// belong to.
#[derive(Debug, Clone)]
pub struct UpstreamAuthenticator {
    client: reqwest::Client,
    authinfo_url: Url,
    auth_type: AuthType,
}

impl UpstreamAuthenticator {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AuthError> {
        let mut base = Url::parse(&config.url).map_err(|e| AuthError::Upstream(e.to_string()))?;
        // `join` replaces the last segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let authinfo_url = base
            .join(AUTHINFO_PATH)
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        Ok(Self {
            client,
            authinfo_url,
            auth_type: AuthType::default(),
        })
    }

    /// Record sessions under the configured login mechanism instead of
    /// `basicauth`.
    pub fn with_auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    async fn check(&self, credentials: &Credentials, ttl: Duration) -> Result<AuthenticationResponse, AuthError> {
        let request = self
            .client
            .get(self.authinfo_url.clone())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .build()
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        let authorization = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(error = %e, "authinfo request failed");
            AuthError::Upstream(e.to_string())
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(AuthError::InvalidCredentials),
            s if !s.is_success() => {
                return Err(AuthError::Upstream(format!("authinfo returned {}", s)));
            }
            _ => {}
        }

        let info: AuthInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("malformed authinfo body: {}", e)))?;
        let user = User::from(info);

        let mut auth_response = AuthenticationResponse::new(user, self.auth_type, ttl);
        auth_response.session.credentials = authorization;
        Ok(auth_response)
    }
}

impl Authenticator for UpstreamAuthenticator {
    fn authenticate<'a>(
        &'a self,
        credentials: &'a Credentials,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<AuthenticationResponse, AuthError>> {
        Box::pin(self.check(credentials, ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authinfo_url_joins_base() {
        let config = UpstreamConfig {
            url: "http://localhost:9200/".into(),
            timeout_secs: 5,
        };
        let auth = UpstreamAuthenticator::new(&config).unwrap();
        assert_eq!(
            auth.authinfo_url.as_str(),
            "http://localhost:9200/_plugins/_security/authinfo"
        );
    }

    #[test]
    fn test_authinfo_url_keeps_path_prefix() {
        let config = UpstreamConfig {
            url: "https://search.internal/cluster-a".into(),
            timeout_secs: 5,
        };
        let auth = UpstreamAuthenticator::new(&config).unwrap();
        assert_eq!(
            auth.authinfo_url.as_str(),
            "https://search.internal/cluster-a/_plugins/_security/authinfo"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = UpstreamConfig {
            url: "not a url".into(),
            timeout_secs: 5,
        };
        assert!(matches!(UpstreamAuthenticator::new(&config), Err(AuthError::Upstream(_))));
    }

    #[test]
    fn test_authinfo_maps_to_user() {
        let info: AuthInfo = serde_json::from_value(serde_json::json!({
            "user_name": "admin",
            "roles": ["all_access"],
            "backend_roles": ["admin"],
            "tenants": { "global_tenant": true, "admin": true },
            "user_requested_tenant": "global_tenant",
            "principal": null
        }))
        .unwrap();
        let user = User::from(info);
        assert_eq!(user.username, "admin");
        assert_eq!(user.roles, vec!["all_access"]);
        assert_eq!(user.tenants.len(), 2);
        assert_eq!(user.selected_tenant.as_deref(), Some("global_tenant"));
    }
}
