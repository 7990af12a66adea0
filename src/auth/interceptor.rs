//! Hook run between a successful identity check and session persistence.

use crate::headers::Headers;
use crate::session::model::AuthenticationResponse;

/// Trait for adjusting a freshly authenticated session.
///
/// Invoked exactly once per successful login with the headers of the login
/// request. Never invoked for unauthenticated requests.
pub trait RequestInterceptor: Send + Sync + std::fmt::Debug {
    fn on_authenticated(&self, request_headers: &Headers, auth_response: &mut AuthenticationResponse);
}

/// Runs interceptors in order.
#[derive(Debug, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Box<dyn RequestInterceptor>>,
}

impl InterceptorChain {
    pub fn new(interceptors: Vec<Box<dyn RequestInterceptor>>) -> Self {
        Self { interceptors }
    }

    pub fn push(&mut self, interceptor: Box<dyn RequestInterceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl RequestInterceptor for InterceptorChain {
    fn on_authenticated(&self, request_headers: &Headers, auth_response: &mut AuthenticationResponse) {
        for interceptor in &self.interceptors {
            interceptor.on_authenticated(request_headers, auth_response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthType;
    use crate::session::model::User;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records every call instead of touching a real session pipeline.
    #[derive(Debug, Default, Clone)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        tag: &'static str,
    }

    impl RequestInterceptor for Recorder {
        fn on_authenticated(&self, headers: &Headers, resp: &mut AuthenticationResponse) {
            self.calls.lock().unwrap().push(format!(
                "{}:{}:{}",
                self.tag,
                resp.user.username,
                headers.len()
            ));
            resp.session.extra.insert(self.tag.into(), serde_json::json!(true));
        }
    }

    #[test]
    fn test_chain_runs_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new(vec![
            Box::new(Recorder { calls: calls.clone(), tag: "first" }),
            Box::new(Recorder { calls: calls.clone(), tag: "second" }),
        ]);
        let headers: Headers = [("x-a", "1")].into_iter().collect();
        let mut resp = AuthenticationResponse::new(User::new("admin"), AuthType::BasicAuth, Duration::from_secs(1));

        chain.on_authenticated(&headers, &mut resp);

        assert_eq!(*calls.lock().unwrap(), vec!["first:admin:1", "second:admin:1"]);
        assert!(resp.session.extra.contains_key("first"));
        assert!(resp.session.extra.contains_key("second"));
    }
}
