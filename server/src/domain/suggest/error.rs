//! Error types for the build and read paths

use thiserror::Error;

use crate::data::DataError;
use crate::data::cache::CacheError;

/// Failure to obtain a usable corpus from the supplier
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Corpus supplier returned status {0}")]
    Status(u16),

    #[error("Malformed corpus payload: {0}")]
    Malformed(String),

    #[error("Corpus is empty")]
    Empty,

    #[error("Failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a build run
///
/// Documents already written before a persistence failure stay in place.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(#[from] CorpusError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] DataError),
}

/// Failure of a single suggestion lookup
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Store error: {0}")]
    Store(#[from] DataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_wraps_corpus_error() {
        let err: BuildError = CorpusError::Empty.into();
        assert!(matches!(err, BuildError::UpstreamFetch(CorpusError::Empty)));
        assert_eq!(err.to_string(), "Upstream fetch failed: Corpus is empty");
    }

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::InvalidArgument("prefix must not be empty");
        assert_eq!(err.to_string(), "Invalid argument: prefix must not be empty");

        let err: LookupError = DataError::Config("no store".into()).into();
        assert!(matches!(err, LookupError::Store(_)));
    }
}
