//! SQLite repositories
//!
//! Types (PrefixDocument, SuggestionRecord) live in `crate::data::types`.

pub mod prefix_document;

pub use prefix_document::{count_documents, get_document, upsert_document};
