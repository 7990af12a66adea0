//! Authentication mode and error kinds.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Login mechanism advertised to clients before they authenticate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    BasicAuth,
    Saml,
    OpenId,
    Proxy,
    Kerberos,
    Jwt,
}

impl AuthType {
    pub const ALL: [AuthType; 6] = [
        AuthType::BasicAuth,
        AuthType::Saml,
        AuthType::OpenId,
        AuthType::Proxy,
        AuthType::Kerberos,
        AuthType::Jwt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::BasicAuth => "basicauth",
            AuthType::Saml => "saml",
            AuthType::OpenId => "openid",
            AuthType::Proxy => "proxy",
            AuthType::Kerberos => "kerberos",
            AuthType::Jwt => "jwt",
        }
    }

    /// Parse a configured mode. Unset or blank means basic auth.
    pub fn from_config(value: Option<&str>) -> Result<Self, UnknownAuthType> {
        match value.map(str::trim) {
            None | Some("") => Ok(AuthType::BasicAuth),
            Some(v) => v.parse(),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown auth type '{0}'")]
pub struct UnknownAuthType(pub String);

impl FromStr for AuthType {
    type Err = UnknownAuthType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AuthType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownAuthType(s.to_string()))
    }
}

/// Failures raised while establishing or checking a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("session expired or missing")]
    SessionExpired,

    #[error("user '{0}' has no roles")]
    MissingRole(String),

    #[error("user '{0}' has no available tenant")]
    MissingTenant(String),

    #[error("identity provider error: {0}")]
    Upstream(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::MissingRole(_) | AuthError::MissingTenant(_) => StatusCode::FORBIDDEN,
            AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::SessionExpired => "session_expired",
            AuthError::MissingRole(_) => "missing_role",
            AuthError::MissingTenant(_) => "missing_tenant",
            AuthError::Upstream(_) => "upstream",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "statusCode": self.status().as_u16(),
            "error": self.status().canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
