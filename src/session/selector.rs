//! Selection of request headers persisted into the session.

use std::sync::Arc;

use crate::auth::interceptor::RequestInterceptor;
use crate::headers::{filter_headers, AllowList, Headers};
use crate::session::model::AuthenticationResponse;

/// Replace `additional_auth_headers` on the response's session with the
/// allow-listed subset of `candidate_headers`.
///
/// Every other session field is left as it was. Applying twice with the same
/// inputs gives the same session.
pub fn apply_additional_headers(
    auth_response: &mut AuthenticationResponse,
    candidate_headers: &Headers,
    allow_list: &AllowList,
) {
    auth_response.session.additional_auth_headers = filter_headers(candidate_headers, allow_list);
}

/// Interceptor that stores allow-listed request headers in new sessions.
#[derive(Debug, Clone)]
pub struct SessionHeaderSelector {
    allow_list: Arc<AllowList>,
}

impl SessionHeaderSelector {
    pub fn new(allow_list: Arc<AllowList>) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }
}

impl RequestInterceptor for SessionHeaderSelector {
    fn on_authenticated(&self, request_headers: &Headers, auth_response: &mut AuthenticationResponse) {
        apply_additional_headers(auth_response, request_headers, &self.allow_list);
        tracing::debug!(
            user = %auth_response.user.username,
            stored = auth_response.session.additional_auth_headers.len(),
            "Stored additional auth headers in session"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthType;
    use crate::session::model::User;
    use std::time::Duration;

    fn response() -> AuthenticationResponse {
        AuthenticationResponse::new(User::new("admin"), AuthType::BasicAuth, Duration::from_secs(60))
    }

    fn request_headers() -> Headers {
        [("test-header-key-1", "v1"), ("test-header-key-2", "v2")]
            .into_iter()
            .collect()
    }

    fn stored(allow: &[&str]) -> Headers {
        let selector = SessionHeaderSelector::new(Arc::new(AllowList::new(allow.iter().copied())));
        let mut resp = response();
        selector.on_authenticated(&request_headers(), &mut resp);
        resp.session.additional_auth_headers
    }

    #[test]
    fn test_single_allowed_header_is_stored() {
        let expected: Headers = [("test-header-key-1", "v1")].into_iter().collect();
        assert_eq!(stored(&["test-header-key-1"]), expected);
    }

    #[test]
    fn test_all_allowed_headers_are_stored() {
        assert_eq!(
            stored(&["test-header-key-1", "test-header-key-2"]),
            request_headers()
        );
    }

    #[test]
    fn test_empty_allow_list_stores_nothing() {
        assert!(stored(&[]).is_empty());
    }

    #[test]
    fn test_overwrites_previous_value_and_keeps_other_fields() {
        let allow = AllowList::new(["test-header-key-2"]);
        let mut resp = response();
        resp.session.additional_auth_headers.insert("stale", "x");
        resp.session.credentials = Some("Basic abc".into());
        resp.session
            .extra
            .insert("tenant".into(), serde_json::json!("global"));

        apply_additional_headers(&mut resp, &request_headers(), &allow);
        let first = resp.session.clone();
        apply_additional_headers(&mut resp, &request_headers(), &allow);

        assert_eq!(resp.session, first);
        assert!(!resp.session.additional_auth_headers.contains("stale"));
        assert_eq!(resp.session.additional_auth_headers.get("test-header-key-2"), Some("v2"));
        assert_eq!(resp.session.credentials.as_deref(), Some("Basic abc"));
        assert_eq!(resp.session.extra.get("tenant"), Some(&serde_json::json!("global")));
    }
}
