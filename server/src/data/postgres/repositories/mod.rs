//! PostgreSQL repositories

pub mod prefix_document;

pub use prefix_document::{count_documents, get_document, upsert_document};
