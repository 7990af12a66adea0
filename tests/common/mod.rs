//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, Response};
use axum::Router;
use futures_util::future::BoxFuture;
use tokio::net::TcpListener;

use dashboards_security::auth::{AuthError, AuthType, Authenticator, Credentials};
use dashboards_security::config::DashboardsConfig;
use dashboards_security::http::{AppState, HttpServer};
use dashboards_security::lifecycle::Shutdown;
use dashboards_security::session::{AuthenticationResponse, MemorySessionStore, SessionId, User};

/// In-memory identity provider keyed by username.
#[derive(Debug, Default)]
pub struct StubAuthenticator {
    users: HashMap<String, (String, User)>,
}

impl StubAuthenticator {
    pub fn with_user(mut self, password: &str, user: User) -> Self {
        self.users
            .insert(user.username.clone(), (password.to_string(), user));
        self
    }
}

impl Authenticator for StubAuthenticator {
    fn authenticate<'a>(
        &'a self,
        credentials: &'a Credentials,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<AuthenticationResponse, AuthError>> {
        let result = match self.users.get(&credentials.username) {
            Some((password, user)) if *password == credentials.password => {
                Ok(AuthenticationResponse::new(user.clone(), AuthType::BasicAuth, ttl))
            }
            _ => Err(AuthError::InvalidCredentials),
        };
        Box::pin(async move { result })
    }
}

pub fn admin_user() -> User {
    let mut user = User::new("admin");
    user.roles.push("all_access".into());
    user.tenants.insert("global_tenant".into(), true);
    user
}

pub fn authenticator() -> StubAuthenticator {
    StubAuthenticator::default().with_user("admin", admin_user())
}

/// A server wired to a stub authenticator, with direct access to its store.
pub struct TestApp {
    pub server: HttpServer,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub fn new(config: DashboardsConfig) -> Self {
        Self::with_authenticator(config, authenticator())
    }

    pub fn with_authenticator(config: DashboardsConfig, authenticator: StubAuthenticator) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let state = AppState::new(config, Arc::new(authenticator), sessions.clone())
            .expect("valid test config");
        Self {
            server: HttpServer::new(state),
            sessions,
        }
    }

    pub fn router(&self) -> Router {
        self.server.router()
    }
}

pub fn login_request(username: &str, password: &str, extra_headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }
    let body = serde_json::json!({ "username": username, "password": password });
    builder.body(Body::from(body.to_string())).unwrap()
}

/// The session ID from the first `Set-Cookie` header with a non-empty value.
pub fn session_id_from_response(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| cookie::Cookie::parse(v.to_string()).ok())
        .filter(|c| c.name() == cookie_name && !c.value().is_empty())
        .find_map(|c| c.value().parse().ok())
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve `server` on an ephemeral port until `shutdown` fires.
pub async fn spawn_server(server: HttpServer, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    addr
}
