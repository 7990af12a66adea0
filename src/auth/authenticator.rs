//! Identity check seam.

use std::fmt;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Deserialize;

use crate::auth::types::AuthError;
use crate::session::model::{AuthenticationResponse, User};

/// Username/password pair submitted to the login route.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Performs the identity-provider round trip.
///
/// Implementations return the authenticated user inside a fresh session that
/// expires after `ttl`. Interceptors and persistence happen afterwards.
pub trait Authenticator: Send + Sync + fmt::Debug {
    fn authenticate<'a>(
        &'a self,
        credentials: &'a Credentials,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<AuthenticationResponse, AuthError>>;
}

/// Reject users the dashboard cannot serve.
pub fn check_user(user: &User, multitenancy_enabled: bool) -> Result<(), AuthError> {
    if user.roles.is_empty() && user.backend_roles.is_empty() {
        return Err(AuthError::MissingRole(user.username.clone()));
    }
    if multitenancy_enabled && user.tenants.is_empty() {
        return Err(AuthError::MissingTenant(user.username.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_user_requires_roles() {
        let user = User::new("nobody");
        assert!(matches!(check_user(&user, false), Err(AuthError::MissingRole(_))));

        let mut user = User::new("reader");
        user.backend_roles.push("readers".into());
        assert!(check_user(&user, false).is_ok());
    }

    #[test]
    fn test_check_user_requires_tenant_when_multitenant() {
        let mut user = User::new("admin");
        user.roles.push("all_access".into());
        assert!(matches!(check_user(&user, true), Err(AuthError::MissingTenant(_))));

        user.tenants.insert("global_tenant".into(), true);
        assert!(check_user(&user, true).is_ok());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let text = format!("{:?}", creds);
        assert!(text.contains("admin"));
        assert!(!text.contains("hunter2"));
    }
}
