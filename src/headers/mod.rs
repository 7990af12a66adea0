//! Header handling subsystem.
//!
//! # Data Flow
//! ```text
//! request HeaderMap
//!     → map.rs (case-insensitive Headers)
//!     → filter.rs (allow-list subset)
//!     → session selector stores the result
//! ```

pub mod filter;
pub mod map;
pub mod normalize;

pub use filter::{filter_headers, AllowList};
pub use map::Headers;
pub use normalize::{normalize, normalize_opt};
