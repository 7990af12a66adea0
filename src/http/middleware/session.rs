//! Session middleware.
//! Requires a live session on every route not explicitly exempted.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::AuthError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::session::cookie::{removal_cookie, session_cookie, session_id_from_headers, to_header_value};
use crate::session::{Session, SessionId};

/// Context attached to requests that carry a valid session.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub id: SessionId,
    pub session: Session,
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if state.is_unauthenticated_route(req.uri().path()) {
        return next.run(req).await;
    }

    let cookie_config = &state.config.cookie;

    let Some(id) = session_id_from_headers(req.headers(), &cookie_config.name) else {
        metrics::record_session_rejected("missing");
        return AuthError::SessionExpired.into_response();
    };

    let Some(mut session) = state.sessions.load(&id) else {
        tracing::debug!(session = %id, "Session cookie references no live session");
        metrics::record_session_rejected("expired");
        let mut response = AuthError::SessionExpired.into_response();
        if let Some(value) = to_header_value(&removal_cookie(cookie_config)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        return response;
    };

    let ttl = state.config.session.ttl();
    let keepalive = state.config.session.keepalive;
    if keepalive {
        session.extend(ttl);
        state.sessions.update(&id, session.clone());
    }

    req.extensions_mut().insert(SessionContext { id, session });
    let mut response = next.run(req).await;

    if keepalive {
        if let Some(value) = to_header_value(&session_cookie(cookie_config, &id, ttl)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}
