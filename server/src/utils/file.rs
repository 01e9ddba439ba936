//! File utility functions

use std::path::PathBuf;

/// Expand a user-supplied path to an absolute path
///
/// `~` and `~/...` resolve against the home directory, relative paths against
/// the current directory. Surrounding whitespace is ignored and an empty
/// string yields the current directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_unchanged() {
        assert_eq!(expand_path("/srv/corpus.json"), PathBuf::from("/srv/corpus.json"));
    }

    #[test]
    fn test_relative_path_becomes_absolute() {
        let result = expand_path("./corpus.json");
        assert!(result.is_absolute());
        assert!(result.ends_with("corpus.json"));

        let result = expand_path("typeahead.json");
        assert_eq!(result, std::env::current_dir().unwrap().join("typeahead.json"));
    }

    #[test]
    fn test_tilde_expansion() {
        let result = expand_path("~/.typeahead/typeahead.json");
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".typeahead/typeahead.json"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_tilde_inside_name_is_literal() {
        let result = expand_path("~backup");
        assert!(result.ends_with("~backup"));
    }

    #[test]
    fn test_whitespace_and_empty() {
        assert_eq!(expand_path("  /srv/data  "), PathBuf::from("/srv/data"));
        assert!(expand_path("   ").is_absolute());
    }
}
