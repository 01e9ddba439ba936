//! Durable application of flattened prefix documents

use std::sync::Arc;

use crate::data::types::PrefixDocument;
use crate::data::{DataError, PrefixStore};

/// Writes prefix documents as independent upserts
///
/// There is no surrounding transaction: the first failing upsert aborts the
/// call and earlier writes remain applied. Rerunning with the same documents
/// overwrites rows with identical content.
pub struct BatchPersister {
    store: Arc<dyn PrefixStore>,
}

impl BatchPersister {
    pub fn new(store: Arc<dyn PrefixStore>) -> Self {
        Self { store }
    }

    /// Apply every document, returning the number written
    pub async fn persist(&self, documents: &[PrefixDocument]) -> Result<usize, DataError> {
        for (applied, document) in documents.iter().enumerate() {
            if let Err(e) = self.store.upsert_document(document).await {
                tracing::error!(
                    error = %e,
                    key = %document.key,
                    applied,
                    total = documents.len(),
                    backend = self.store.backend_name(),
                    "Prefix document upsert failed, aborting batch"
                );
                return Err(e);
            }
        }

        tracing::debug!(
            documents = documents.len(),
            backend = self.store.backend_name(),
            "Wrote prefix documents"
        );
        Ok(documents.len())
    }
}
