//! Prefix document repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{PrefixDocument, decode_suggestions, encode_suggestions};

/// Get the document stored under an exact prefix
pub async fn get_document(
    pool: &SqlitePool,
    key: &str,
) -> Result<Option<PrefixDocument>, SqliteError> {
    let raw: Option<String> =
        sqlx::query_scalar("SELECT suggestions FROM prefix_documents WHERE prefix = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    raw.map(|raw| {
        decode_suggestions(&raw)
            .map(|suggestions| PrefixDocument::new(key, suggestions))
            .map_err(|e| SqliteError::CorruptDocument {
                key: key.to_string(),
                error: e.to_string(),
            })
    })
    .transpose()
}

/// Replace the document for its prefix, inserting it if absent
pub async fn upsert_document(
    pool: &SqlitePool,
    document: &PrefixDocument,
) -> Result<(), SqliteError> {
    let suggestions = encode_suggestions(&document.suggestions)?;

    sqlx::query(
        r#"
        INSERT INTO prefix_documents (prefix, suggestions)
        VALUES (?, ?)
        ON CONFLICT(prefix) DO UPDATE SET suggestions = excluded.suggestions
        "#,
    )
    .bind(&document.key)
    .bind(&suggestions)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count stored documents
pub async fn count_documents(pool: &SqlitePool) -> Result<u64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prefix_documents")
        .fetch_one(pool)
        .await?;
    Ok(count.max(0) as u64)
}
