//! Data storage layer
//!
//! Provides the stores behind the suggestion pipeline:
//! - `sqlite` - Embedded document store (default)
//! - `postgres` - Shared document store for multi-server deployments
//! - `cache` - In-memory and Redis caching
//! - `types` - Shared data types across all backends
//! - `traits` - Store trait for multi-database support
//! - `error` - Unified error type for all backends

pub mod cache;
pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use postgres::PostgresService;
pub use sqlite::SqliteService;

pub use error::DataError;
pub use traits::PrefixStore;
pub use types::{PrefixDocument, SuggestionRecord};

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{PostgresConfig, StoreBackend};
use crate::core::storage::AppStorage;

/// Document store service enum
///
/// Wraps the backend-specific service (SQLite or PostgreSQL). Services are
/// stored as Arc so background tasks and the repository can share them.
pub enum DocumentStoreService {
    /// SQLite backend (default, embedded)
    Sqlite(Arc<SqliteService>),
    /// PostgreSQL backend (shared across servers)
    Postgres(Arc<PostgresService>),
}

impl DocumentStoreService {
    /// Initialize the store based on configuration
    ///
    /// SQLite uses the storage path; PostgreSQL requires a PostgresConfig.
    pub async fn init(
        backend: StoreBackend,
        storage: &AppStorage,
        postgres_config: Option<&PostgresConfig>,
    ) -> Result<Self, DataError> {
        match backend {
            StoreBackend::Sqlite => {
                let service = SqliteService::init(storage).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            StoreBackend::Postgres => {
                let config = postgres_config.ok_or_else(|| {
                    DataError::Config("PostgreSQL configuration required".to_string())
                })?;
                let service = PostgresService::init(config).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
        }
    }

    /// Run a WAL checkpoint (SQLite); PostgreSQL needs none
    pub async fn checkpoint(&self) -> Result<(), DataError> {
        match self {
            Self::Sqlite(s) => s.checkpoint().await.map_err(Into::into),
            Self::Postgres(_) => Ok(()),
        }
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }

    /// Start the background maintenance task
    ///
    /// WAL checkpointing for SQLite, a periodic ping for PostgreSQL.
    pub fn start_maintenance_task(&self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        match self {
            Self::Sqlite(s) => s.start_checkpoint_task(shutdown_rx),
            Self::Postgres(p) => p.start_health_check_task(shutdown_rx),
        }
    }

    /// Get the backend type
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Sqlite(_) => StoreBackend::Sqlite,
            Self::Postgres(_) => StoreBackend::Postgres,
        }
    }

    /// Get the store trait object for document operations
    pub fn repository(&self) -> Arc<dyn PrefixStore> {
        match self {
            Self::Sqlite(s) => Arc::new(Arc::clone(s)),
            Self::Postgres(p) => Arc::new(Arc::clone(p)),
        }
    }
}
