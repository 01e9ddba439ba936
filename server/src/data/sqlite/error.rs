//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Corrupt document {key}: {error}")]
    CorruptDocument { key: String, error: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
