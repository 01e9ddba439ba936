//! Unified error type for data layer
//!
//! Wraps errors from both document store backends (SQLite, PostgreSQL) while
//! preserving which backend produced them.

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Stored document could not be decoded
    #[error("Corrupt document {key} on {backend}: {error}")]
    CorruptDocument {
        backend: &'static str,
        key: String,
        error: String,
    },

    /// Document could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
            Self::MigrationFailed { backend, .. } | Self::CorruptDocument { backend, .. } => {
                backend
            }
            Self::Serialization(_) | Self::Config(_) => "unknown",
        }
    }
}

/// Convert from the SQLite backend error type
impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        use crate::data::sqlite::SqliteError;
        match e {
            SqliteError::Database(e) => Self::Sqlite(e),
            SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
            SqliteError::CorruptDocument { key, error } => Self::CorruptDocument {
                backend: "sqlite",
                key,
                error,
            },
            SqliteError::Serialization(e) => Self::Serialization(e),
        }
    }
}

/// Convert from the PostgreSQL backend error type
impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        use crate::data::postgres::PostgresError;
        match e {
            PostgresError::Database(e) => Self::Postgres(e),
            PostgresError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "postgres",
                version,
                name,
                error,
            },
            PostgresError::CorruptDocument { key, error } => Self::CorruptDocument {
                backend: "postgres",
                key,
                error,
            },
            PostgresError::Serialization(e) => Self::Serialization(e),
            PostgresError::Config(msg) => Self::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteError;

    #[test]
    fn test_sqlite_migration_error_keeps_backend() {
        let err: DataError = SqliteError::MigrationFailed {
            version: 3,
            name: "x".to_string(),
            error: "boom".to_string(),
        }
        .into();
        assert_eq!(err.backend(), "sqlite");
        assert_eq!(err.to_string(), "Migration 3 (x) failed on sqlite: boom");
    }

    #[test]
    fn test_sqlite_database_error_maps_to_sqlite() {
        let err: DataError = SqliteError::Database(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, DataError::Sqlite(_)));
        assert_eq!(err.backend(), "sqlite");
    }

    #[test]
    fn test_postgres_config_error() {
        let err: DataError =
            crate::data::postgres::PostgresError::Config("bad url".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: bad url");
    }
}
