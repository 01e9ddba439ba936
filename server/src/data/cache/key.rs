//! Type-safe cache key builder with versioning

use crate::core::constants::CACHE_KEY_VERSION;

/// Type-safe cache key builder
///
/// All keys are prefixed with a version (e.g., "v1:") so a change in the
/// cached value encoding can retire every old entry at once.
pub struct CacheKey;

impl CacheKey {
    /// Cache key for the suggestion list of a prefix
    ///
    /// The prefix is appended verbatim, so distinct prefixes always map to
    /// distinct keys.
    pub fn suggestions(prefix: &str) -> String {
        format!("{}:suggest:{}", CACHE_KEY_VERSION, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_key() {
        assert_eq!(CacheKey::suggestions("ca"), "v1:suggest:ca");
    }

    #[test]
    fn test_keys_preserve_case_and_whitespace() {
        assert_ne!(CacheKey::suggestions("Ca"), CacheKey::suggestions("ca"));
        assert_ne!(CacheKey::suggestions("ca "), CacheKey::suggestions("ca"));
        assert_eq!(CacheKey::suggestions("a:b"), "v1:suggest:a:b");
    }
}
