//! Allow-list header filtering.
//!
//! # Design Decisions
//! - Allow-list, never deny-list: an empty list admits nothing
//! - Set semantics: order and duplicates in the list do not matter
//! - Result keys keep the request's spelling; values are untouched

use std::collections::BTreeSet;

use super::map::Headers;
use super::normalize::normalize;

/// Normalized set of header names permitted to pass a filter.
///
/// Built once from configuration and shared read-only between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    /// Build from configured names. Blank entries are dropped here; config
    /// validation rejects them before this point.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| normalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn allows(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Return the subset of `headers` whose names appear in `allow_list`.
pub fn filter_headers(headers: &Headers, allow_list: &AllowList) -> Headers {
    if allow_list.is_empty() {
        return Headers::new();
    }
    headers
        .iter_keyed()
        .filter(|(key, _, _)| allow_list.names.contains(*key))
        .map(|(_, name, value)| (name, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Headers {
        [
            ("test-header-key-1", "v1"),
            ("test-header-key-2", "v2"),
            ("Authorization", "Basic abc"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_only_allowed_headers_pass() {
        let allow = AllowList::new(["test-header-key-1"]);
        let out = filter_headers(&sample(), &allow);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("test-header-key-1"), Some("v1"));
        assert!(out.iter().all(|(name, _)| allow.allows(name)));
    }

    #[test]
    fn test_empty_allow_list_yields_nothing() {
        let out = filter_headers(&sample(), &AllowList::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_case_insensitive_match_preserves_value_and_spelling() {
        let headers: Headers = [("X-Test", "v")].into_iter().collect();
        let out = filter_headers(&headers, &AllowList::new(["x-test"]));
        assert_eq!(out.iter().collect::<Vec<_>>(), vec![("X-Test", "v")]);

        let out = filter_headers(&headers, &AllowList::new(["  X-TEST "]));
        assert_eq!(out.get("x-test"), Some("v"));
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let a = AllowList::new(["test-header-key-2", "test-header-key-1"]);
        let b = AllowList::new(["test-header-key-1", "TEST-HEADER-KEY-1", "test-header-key-2"]);
        assert_eq!(a, b);
        assert_eq!(filter_headers(&sample(), &a), filter_headers(&sample(), &b));
    }

    #[test]
    fn test_missing_allowed_headers_are_omitted() {
        let allow = AllowList::new(["x-not-present", "authorization"]);
        let out = filter_headers(&sample(), &allow);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("authorization"), Some("Basic abc"));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let allow = AllowList::new(["test-header-key-2", "authorization"]);
        let once = filter_headers(&sample(), &allow);
        let twice = filter_headers(&once, &allow);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_headers() {
        let out = filter_headers(&Headers::new(), &AllowList::new(["x-test"]));
        assert!(out.is_empty());
    }
}
