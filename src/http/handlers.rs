//! Route handlers.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{check_user, AuthError, AuthType, Credentials};
use crate::headers::Headers;
use crate::http::middleware::session::SessionContext;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::session::cookie::{removal_cookie, session_cookie, session_id_from_headers, to_header_value};
use crate::session::User;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthTypeResponse {
    pub authtype: AuthType,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub roles: Vec<String>,
    pub backend_roles: Vec<String>,
    pub tenants: BTreeMap<String, bool>,
    pub selected_tenant: Option<String>,
}

impl From<User> for LoginResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            roles: user.roles,
            backend_roles: user.backend_roles,
            tenants: user.tenants,
            selected_tenant: user.selected_tenant,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthInfoResponse {
    pub user_name: String,
    pub auth_type: AuthType,
    pub roles: Vec<String>,
    pub backend_roles: Vec<String>,
    pub tenants: BTreeMap<String, bool>,
    pub selected_tenant: Option<String>,
    /// Names only; values may carry credentials.
    pub stored_headers: Vec<String>,
}

/// Report the configured login mechanism. Reachable without a session.
pub async fn auth_type(State(state): State<AppState>) -> Json<AuthTypeResponse> {
    Json(AuthTypeResponse {
        authtype: state.auth_type,
    })
}

/// Authenticate, persist the session and hand back its cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<Response, AuthError> {
    let ttl = state.config.session.ttl();

    let mut auth_response = match state.authenticator.authenticate(&credentials, ttl).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(username = %credentials.username, error = %e, "Login failed");
            metrics::record_login(e.kind());
            return Err(e);
        }
    };

    if let Err(e) = check_user(&auth_response.user, state.config.auth.multitenancy_enabled) {
        tracing::warn!(username = %credentials.username, error = %e, "Login rejected");
        metrics::record_login(e.kind());
        return Err(e);
    }

    state
        .interceptor
        .on_authenticated(&Headers::from(&headers), &mut auth_response);

    // A fresh login replaces whatever session the client already held.
    if let Some(old_id) = session_id_from_headers(&headers, &state.config.cookie.name) {
        if state.sessions.remove(&old_id).is_some() {
            tracing::debug!(session = %old_id, "Replaced previous session");
        }
    }

    let user = auth_response.user;
    let id = state.sessions.create(auth_response.session);
    tracing::info!(username = %user.username, session = %id, "Login succeeded");
    metrics::record_login("success");

    let mut response = Json(LoginResponse::from(user)).into_response();
    if let Some(value) = to_header_value(&session_cookie(&state.config.cookie, &id, ttl)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Drop the session, if any, and expire the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers, &state.config.cookie.name) {
        if let Some(session) = state.sessions.remove(&id) {
            tracing::info!(username = %session.user.username, session = %id, "Logged out");
            metrics::record_logout();
        }
    }

    let mut response = Json(serde_json::json!({})).into_response();
    if let Some(value) = to_header_value(&removal_cookie(&state.config.cookie)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Describe the user behind the current session.
///
/// Answers 401 when no session context is attached, which happens if the
/// path was configured as an unauthenticated route.
pub async fn auth_info(
    ctx: Option<Extension<SessionContext>>,
) -> Result<Json<AuthInfoResponse>, AuthError> {
    let Some(Extension(ctx)) = ctx else {
        return Err(AuthError::SessionExpired);
    };
    let session = ctx.session;
    Ok(Json(AuthInfoResponse {
        stored_headers: session.additional_auth_headers.names(),
        user_name: session.user.username,
        auth_type: session.auth_type,
        roles: session.user.roles,
        backend_roles: session.user.backend_roles,
        tenants: session.user.tenants,
        selected_tenant: session.user.selected_tenant,
    }))
}
