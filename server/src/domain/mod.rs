//! Domain logic for type-ahead suggestions
//!
//! - `suggest` - prefix trie construction, flattening, persistence and lookup

pub mod suggest;

pub use suggest::{BuildPipeline, SuggestCache};
