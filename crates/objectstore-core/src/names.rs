//! Naming rules for components.
//!
//! Setters validate names eagerly (fail-fast on assignment) and the
//! validation pass re-checks them semantically, so both paths share the
//! helpers here. Patterns are compiled once and cached for the lifetime of
//! the process.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Pattern every component name must satisfy: a letter followed by
/// letters, digits, underscores, or dashes.
pub const NAME_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_\-]*$";

/// Thread-safe cache of compiled patterns, keyed by pattern source.
struct RegexCache {
    cache: std::sync::RwLock<std::collections::HashMap<String, Regex>>,
}

impl RegexCache {
    fn new() -> Self {
        Self {
            cache: std::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }

    fn get_or_compile(&self, pattern: &str) -> std::result::Result<Regex, regex::Error> {
        // Fast path: already compiled.
        {
            let cache = self.cache.read().unwrap();
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(pattern)?;
        {
            let mut cache = self.cache.write().unwrap();
            cache.insert(pattern.to_string(), regex.clone());
        }
        Ok(regex)
    }
}

fn regex_cache() -> &'static RegexCache {
    static CACHE: OnceLock<RegexCache> = OnceLock::new();
    CACHE.get_or_init(RegexCache::new)
}

/// Check a value against a cached pattern.
///
/// An invalid pattern logs a warning and reads as a non-match; name checks
/// should be resilient, not panicky.
pub fn matches_pattern(value: &str, pattern: &str) -> bool {
    match regex_cache().get_or_compile(pattern) {
        Ok(regex) => regex.is_match(value),
        Err(e) => {
            tracing::warn!(
                pattern,
                error = %e,
                "invalid pattern in name check, treating as non-match"
            );
            false
        }
    }
}

/// Whether a string is a legal component name.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && matches_pattern(name, NAME_PATTERN)
}

/// Enforce the name rule at an assignment seam.
///
/// Used by setters and direct-value constructors; the error is immediate,
/// never deferred to the validation pass.
pub fn require_valid_name(target: &'static str, name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            target,
            format!("\"{name}\" is not a valid name"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        assert!(is_valid_name("page"));
        assert!(is_valid_name("sys_title"));
        assert!(is_valid_name("Admin-2"));
    }

    #[test]
    fn rejects_empty_and_malformed_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2page"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("name!"));
    }

    #[test]
    fn require_valid_name_is_fail_fast() {
        assert!(require_valid_name("PSXParam/name", "ok_name").is_ok());
        let err = require_valid_name("PSXParam/name", "not ok").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn invalid_pattern_reads_as_non_match() {
        assert!(!matches_pattern("anything", r"[unclosed"));
    }

    #[test]
    fn patterns_are_cached_across_calls() {
        assert!(matches_pattern("abc", r"^[a-c]+$"));
        assert!(matches_pattern("cab", r"^[a-c]+$"));
        assert!(!matches_pattern("xyz", r"^[a-c]+$"));
    }
}
