//! Session cookie encoding.

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{Cookie, SameSite};

use crate::config::{CookieConfig, SameSitePolicy};
use crate::session::store::SessionId;

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

fn base(config: &CookieConfig, value: String) -> cookie::CookieBuilder<'static> {
    let mut builder = Cookie::build((config.name.clone(), value))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site.into());
    if let Some(domain) = &config.domain {
        builder = builder.domain(domain.clone());
    }
    builder
}

/// Cookie that references `id` for `ttl`.
pub fn session_cookie(config: &CookieConfig, id: &SessionId, ttl: Duration) -> Cookie<'static> {
    let max_age = cookie::time::Duration::seconds(ttl.as_secs().min(i64::MAX as u64) as i64);
    base(config, id.to_string()).max_age(max_age).build()
}

/// Cookie instructing the browser to forget the session.
pub fn removal_cookie(config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = base(config, String::new()).build();
    cookie.make_removal();
    cookie
}

/// Render a cookie as a `Set-Cookie` header value.
pub fn to_header_value(cookie: &Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Find the session ID in the request's `Cookie` headers.
///
/// Unparseable cookies and values that are not session IDs are ignored.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|part| Cookie::parse(part.trim()).ok())
        .filter(|c| c.name() == cookie_name)
        .find_map(|c| c.value().parse().ok())
}
