//! In-memory prefix tree with a bounded, ranked suggestion list per node

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::constants::MAX_SUGGESTIONS;
use crate::data::types::SuggestionRecord;

/// A node in the prefix tree
///
/// Every node is reached by exactly one character path from the root, so the
/// concatenation of those characters is the node's prefix. `top_k` holds at
/// most `limit` records sorted by descending frequency, with equal
/// frequencies kept in insertion order. Every node on a query's path shares
/// the same record allocation.
#[derive(Debug, Default)]
pub struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    top_k: Vec<Arc<SuggestionRecord>>,
    is_terminal: bool,
    terminal_frequency: i64,
}

impl TrieNode {
    pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> {
        self.children.iter().map(|(ch, node)| (*ch, node))
    }

    pub fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children.get(&ch)
    }

    pub fn top_k(&self) -> &[Arc<SuggestionRecord>] {
        &self.top_k
    }

    /// Owned copy of the ranked list
    pub fn suggestions(&self) -> Vec<SuggestionRecord> {
        self.top_k.iter().map(|record| (**record).clone()).collect()
    }

    /// Whether some inserted query ends exactly at this node
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Frequency of the most recent query that ended at this node
    pub fn terminal_frequency(&self) -> i64 {
        self.terminal_frequency
    }

    /// Offer a record to this node's ranked list
    ///
    /// Equivalent to append, stable sort by descending frequency, truncate.
    /// The record lands after every entry with an equal or higher frequency.
    fn offer(&mut self, record: &Arc<SuggestionRecord>, limit: usize) {
        let at = self
            .top_k
            .partition_point(|existing| existing.frequency >= record.frequency);
        if at >= limit {
            return;
        }
        self.top_k.insert(at, Arc::clone(record));
        self.top_k.truncate(limit);
    }
}

// Nested maps would otherwise drop recursively, one stack frame per character
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<TrieNode> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

/// Builds a prefix tree from a corpus of suggestion records
///
/// Later duplicates of the same query text are not merged; each insertion is
/// offered to the ranked lists independently.
#[derive(Debug)]
pub struct TrieBuilder {
    root: TrieNode,
    limit: usize,
    inserted: usize,
    nodes: usize,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self::with_limit(MAX_SUGGESTIONS)
    }

    /// Create a builder retaining `limit` suggestions per node
    pub fn with_limit(limit: usize) -> Self {
        Self {
            root: TrieNode::default(),
            limit,
            inserted: 0,
            nodes: 1,
        }
    }

    /// Insert one query, updating the ranked list of every node on its path
    ///
    /// The root itself is only updated when the query is empty.
    pub fn insert(&mut self, record: &SuggestionRecord) {
        let limit = self.limit;
        let shared = Arc::new(record.clone());
        let mut created = 0;
        let mut node = &mut self.root;
        if record.query.is_empty() {
            node.offer(&shared, limit);
        }
        for ch in record.query.chars() {
            node = node.children.entry(ch).or_insert_with(|| {
                created += 1;
                TrieNode::default()
            });
            node.offer(&shared, limit);
        }
        node.is_terminal = true;
        node.terminal_frequency = record.frequency;
        self.nodes += created;
        self.inserted += 1;
    }

    /// Insert every record in corpus order
    pub fn extend<'a>(&mut self, records: impl IntoIterator<Item = &'a SuggestionRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Walk the tree along `prefix`
    pub fn find(&self, prefix: &str) -> Option<&TrieNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, ch| node.child(ch))
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of records inserted so far
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> usize {
        self.nodes
    }
}
