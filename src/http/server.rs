//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, session)
//! - Bind server to listener
//! - Sweep expired sessions in the background

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::{SetSensitiveRequestHeadersLayer, SetSensitiveResponseHeadersLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{AuthType, Authenticator, InterceptorChain, RequestInterceptor};
use crate::config::{ConfigError, DashboardsConfig, ValidationError};
use crate::http::handlers;
use crate::http::middleware::session::session_middleware;
use crate::observability::metrics;
use crate::session::{SessionHeaderSelector, SessionStore};

/// Routes served without a session.
pub const AUTH_TYPE_PATH: &str = "/api/authtype";
pub const LEGACY_AUTH_TYPE_PATH: &str = "/api/v1/auth/authtype";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
/// Requires a session.
pub const AUTH_INFO_PATH: &str = "/api/v1/auth/authinfo";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardsConfig>,
    pub auth_type: AuthType,
    pub authenticator: Arc<dyn Authenticator>,
    pub interceptor: Arc<dyn RequestInterceptor>,
    pub sessions: Arc<dyn SessionStore>,
    unauthenticated_routes: Arc<HashSet<String>>,
}

impl AppState {
    /// Resolve configuration into shared state.
    ///
    /// The session header selector is installed as the login interceptor.
    pub fn new(
        config: DashboardsConfig,
        authenticator: Arc<dyn Authenticator>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, ConfigError> {
        let auth_type = config
            .auth
            .resolved_type()
            .map_err(|e| ConfigError::Validation(vec![ValidationError::UnknownAuthType(e.0)]))?;

        let selector = SessionHeaderSelector::new(Arc::new(config.session.allow_list()));
        let interceptor = InterceptorChain::new(vec![Box::new(selector)]);

        let unauthenticated_routes: HashSet<String> = [AUTH_TYPE_PATH, LEGACY_AUTH_TYPE_PATH, LOGIN_PATH, LOGOUT_PATH]
            .into_iter()
            .map(String::from)
            .chain(config.auth.unauthenticated_routes.iter().cloned())
            .collect();

        Ok(Self {
            config: Arc::new(config),
            auth_type,
            authenticator,
            interceptor: Arc::new(interceptor),
            sessions,
            unauthenticated_routes: Arc::new(unauthenticated_routes),
        })
    }

    /// Replace the login interceptor.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = interceptor;
        self
    }

    pub fn is_unauthenticated_route(&self, path: &str) -> bool {
        self.unauthenticated_routes.contains(path)
    }
}

/// HTTP server for the dashboards security service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let server = &state.config.server;
        let request_timeout = Duration::from_secs(server.request_timeout_secs);
        let max_body_size = server.max_body_size;
        let x_request_id = HeaderName::from_static("x-request-id");

        Router::new()
            .route(AUTH_TYPE_PATH, get(handlers::auth_type))
            .route(LEGACY_AUTH_TYPE_PATH, get(handlers::auth_type))
            .route(LOGIN_PATH, post(handlers::login))
            .route(LOGOUT_PATH, post(handlers::logout))
            .route(AUTH_INFO_PATH, get(handlers::auth_info))
            .route_layer(middleware::from_fn_with_state(state.clone(), session_middleware))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(max_body_size))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetSensitiveResponseHeadersLayer::new([header::SET_COOKIE]))
            .layer(TraceLayer::new_for_http())
            .layer(SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &DashboardsConfig {
        &self.state.config
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_type = %self.state.auth_type,
            "HTTP server starting"
        );

        let purge = tokio::spawn(purge_expired_sessions(
            self.state.sessions.clone(),
            Duration::from_secs(self.state.config.session.purge_interval_secs),
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        purge.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Periodically drop expired sessions until shutdown.
async fn purge_expired_sessions(
    sessions: Arc<dyn SessionStore>,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let purged = sessions.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired sessions");
                    metrics::record_sessions_purged(purged);
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
