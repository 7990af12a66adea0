//! Header name normalization.
//!
//! Header names compare case-insensitively, so every lookup in this crate goes
//! through the same key form: surrounding whitespace trimmed, ASCII and
//! Unicode letters lower-cased.

/// Normalize a header name for case-insensitive set membership.
///
/// Empty input yields an empty string. Never fails.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Same as [`normalize`], for names that may be absent.
pub fn normalize_opt(name: Option<&str>) -> String {
    name.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("X-Test"), "x-test");
        assert_eq!(normalize("  Authorization\t"), "authorization");
        assert_eq!(normalize("already-lower"), "already-lower");
    }

    #[test]
    fn test_normalize_empty_and_absent() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" X-Forwarded-User ")), "x-forwarded-user");
    }
}
