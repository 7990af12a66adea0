//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! login:   AuthenticationResponse → selector.rs → store.rs (create) → cookie.rs (Set-Cookie)
//! request: Cookie header → cookie.rs (session ID) → store.rs (load, keepalive)
//! logout:  store.rs (remove) → cookie.rs (removal cookie)
//! ```

pub mod cookie;
pub mod model;
pub mod selector;
pub mod store;

pub use model::{AuthenticationResponse, Session, User};
pub use selector::{apply_additional_headers, SessionHeaderSelector};
pub use store::{MemorySessionStore, SessionId, SessionStore};
