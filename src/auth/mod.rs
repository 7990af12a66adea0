//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! POST /auth/login
//!     → authenticator.rs (identity-provider round trip)
//!     → check_user (roles, tenants)
//!     → interceptor.rs (session adjustments, e.g. stored headers)
//!     → session store + cookie
//! ```
//!
//! # Design Decisions
//! - The identity check and the session hooks are separate traits so both can
//!   be swapped for in-memory stand-ins
//! - Interceptors only ever see authenticated responses

pub mod authenticator;
pub mod interceptor;
pub mod types;
pub mod upstream;

pub use authenticator::{check_user, Authenticator, Credentials};
pub use interceptor::{InterceptorChain, RequestInterceptor};
pub use types::{AuthError, AuthType, UnknownAuthType};
pub use upstream::UpstreamAuthenticator;
