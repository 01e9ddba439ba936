//! Repository traits for multi-database support

use async_trait::async_trait;

use super::error::DataError;
use super::types::PrefixDocument;

/// Durable keyed store of prefix documents
///
/// Implemented by both SQLite and PostgreSQL services. Keys are matched
/// exactly, with no normalization of case or whitespace.
#[async_trait]
pub trait PrefixStore: Send + Sync {
    /// Fetch the document for an exact prefix
    async fn get_document(&self, key: &str) -> Result<Option<PrefixDocument>, DataError>;

    /// Replace the document for its key, inserting it if absent
    async fn upsert_document(&self, document: &PrefixDocument) -> Result<(), DataError>;

    /// Number of stored documents
    async fn count_documents(&self) -> Result<u64, DataError>;

    /// Health check (validates connection)
    async fn health_check(&self) -> Result<(), DataError>;

    /// Backend name for debugging/logging
    fn backend_name(&self) -> &'static str;
}
