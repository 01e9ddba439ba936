//! Prefix suggestions
//!
//! Build side: corpus -> [`TrieBuilder`] -> [`TrieFlattener`] -> [`BatchPersister`].
//! Read side: [`SuggestCache`] serves persisted documents through the cache.

pub mod corpus;
pub mod error;
mod flatten;
mod lookup;
mod persist;
mod pipeline;
mod trie;

pub use corpus::{CorpusSource, FileCorpusSource, HttpCorpusSource};
pub use error::{BuildError, CorpusError, LookupError};
pub use flatten::TrieFlattener;
pub use lookup::SuggestCache;
pub use persist::BatchPersister;
pub use pipeline::{BuildPipeline, BuildReport, BuildReportBody};
pub use trie::{TrieBuilder, TrieNode};
