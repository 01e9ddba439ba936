//! Prefix document repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::types::{PrefixDocument, decode_suggestions, encode_suggestions};

/// Get the document stored under an exact prefix
pub async fn get_document(
    pool: &PgPool,
    key: &str,
) -> Result<Option<PrefixDocument>, PostgresError> {
    let raw: Option<String> =
        sqlx::query_scalar("SELECT suggestions FROM prefix_documents WHERE prefix = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    raw.map(|raw| {
        decode_suggestions(&raw)
            .map(|suggestions| PrefixDocument::new(key, suggestions))
            .map_err(|e| PostgresError::CorruptDocument {
                key: key.to_string(),
                error: e.to_string(),
            })
    })
    .transpose()
}

/// Replace the document for its prefix, inserting it if absent
pub async fn upsert_document(
    pool: &PgPool,
    document: &PrefixDocument,
) -> Result<(), PostgresError> {
    let suggestions = encode_suggestions(&document.suggestions)?;

    sqlx::query(
        r#"
        INSERT INTO prefix_documents (prefix, suggestions)
        VALUES ($1, $2)
        ON CONFLICT (prefix) DO UPDATE SET suggestions = EXCLUDED.suggestions
        "#,
    )
    .bind(&document.key)
    .bind(&suggestions)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count stored documents
pub async fn count_documents(pool: &PgPool) -> Result<u64, PostgresError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prefix_documents")
        .fetch_one(pool)
        .await?;
    Ok(count.max(0) as u64)
}
