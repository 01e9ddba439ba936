//! Corpus suppliers for the builder
//!
//! The corpus is a JSON array of `{query, frequency}` objects. Other fields
//! sent by the aggregator are ignored.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::error::CorpusError;
use crate::core::config::CorpusConfig;
use crate::core::constants::MAX_QUERY_CHARS;
use crate::data::types::SuggestionRecord;

/// Source of `(query, frequency)` records for one build
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Fetch the full corpus in supplier order
    async fn fetch(&self) -> Result<Vec<SuggestionRecord>, CorpusError>;

    /// Human-readable origin for logging
    fn describe(&self) -> String;
}

/// Select the configured source: a local file when set, else the endpoint
pub fn from_config(config: &CorpusConfig) -> Result<Arc<dyn CorpusSource>, CorpusError> {
    match &config.file {
        Some(path) => Ok(Arc::new(FileCorpusSource::new(path.clone()))),
        None => Ok(Arc::new(HttpCorpusSource::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?)),
    }
}

/// Decode and validate a corpus payload
///
/// Insertion order matters for tie-breaking, so records keep payload order.
fn parse_corpus(body: &[u8]) -> Result<Vec<SuggestionRecord>, CorpusError> {
    let records: Vec<SuggestionRecord> =
        serde_json::from_slice(body).map_err(|e| CorpusError::Malformed(e.to_string()))?;

    if records.is_empty() {
        return Err(CorpusError::Empty);
    }

    for (index, record) in records.iter().enumerate() {
        if record.frequency < 0 {
            return Err(CorpusError::Malformed(format!(
                "record {} ({:?}) has negative frequency {}",
                index, record.query, record.frequency
            )));
        }
        // Trie depth and memory grow with query length
        let chars = record.query.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(CorpusError::Malformed(format!(
                "record {} has a query of {} characters (max {})",
                index, chars, MAX_QUERY_CHARS
            )));
        }
    }

    Ok(records)
}

/// Aggregation endpoint queried with a single GET
pub struct HttpCorpusSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCorpusSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, CorpusError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("Typeahead/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CorpusSource for HttpCorpusSource {
    async fn fetch(&self) -> Result<Vec<SuggestionRecord>, CorpusError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CorpusError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        parse_corpus(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Corpus read from a local JSON file
pub struct FileCorpusSource {
    path: PathBuf,
}

impl FileCorpusSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl CorpusSource for FileCorpusSource {
    async fn fetch(&self) -> Result<Vec<SuggestionRecord>, CorpusError> {
        let body = tokio::fs::read(&self.path).await?;
        parse_corpus(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
