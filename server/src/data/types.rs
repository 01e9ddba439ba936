//! Shared data types for the suggestion pipeline and its stores

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A historical query paired with its aggregated popularity
///
/// Extra fields in upstream payloads (e.g. `lastUpdated`) are ignored on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuggestionRecord {
    /// The full query text
    pub query: String,
    /// Aggregated popularity, higher ranks first
    pub frequency: i64,
}

impl SuggestionRecord {
    pub fn new(query: impl Into<String>, frequency: i64) -> Self {
        Self {
            query: query.into(),
            frequency,
        }
    }
}

/// Persisted unit keyed by prefix, holding that prefix's ranked suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixDocument {
    pub key: String,
    pub suggestions: Vec<SuggestionRecord>,
}

impl PrefixDocument {
    pub fn new(key: impl Into<String>, suggestions: Vec<SuggestionRecord>) -> Self {
        Self {
            key: key.into(),
            suggestions,
        }
    }
}

/// Encode a suggestion list into the stored column representation
///
/// Only the query and frequency are stored, so rewriting a document with the
/// same suggestions yields byte-identical content.
pub fn encode_suggestions(suggestions: &[SuggestionRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(suggestions)
}

/// Decode a stored suggestion list
pub fn decode_suggestions(raw: &str) -> Result<Vec<SuggestionRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ignores_extra_fields() {
        let json = r#"{"query":"cat","frequency":100,"lastUpdated":"2024-01-01T00:00:00Z"}"#;
        let record: SuggestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, SuggestionRecord::new("cat", 100));
    }

    #[test]
    fn test_encoding_is_stable() {
        let suggestions = vec![
            SuggestionRecord::new("car", 80),
            SuggestionRecord::new("cat", 80),
        ];
        let first = encode_suggestions(&suggestions).unwrap();
        let second = encode_suggestions(&suggestions).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            r#"[{"query":"car","frequency":80},{"query":"cat","frequency":80}]"#
        );
        assert_eq!(decode_suggestions(&first).unwrap(), suggestions);
    }
}
