//! PrefixStore trait implementation for PostgreSQL

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::PrefixStore;
use crate::data::types::PrefixDocument;

use super::PostgresService;
use super::repositories::prefix_document;

#[async_trait]
impl PrefixStore for Arc<PostgresService> {
    async fn get_document(&self, key: &str) -> Result<Option<PrefixDocument>, DataError> {
        prefix_document::get_document(self.pool(), key)
            .await
            .map_err(Into::into)
    }

    async fn upsert_document(&self, document: &PrefixDocument) -> Result<(), DataError> {
        prefix_document::upsert_document(self.pool(), document)
            .await
            .map_err(Into::into)
    }

    async fn count_documents(&self) -> Result<u64, DataError> {
        prefix_document::count_documents(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn health_check(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(DataError::Postgres)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
