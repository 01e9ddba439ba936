//! Prefix tree flattening into persistable documents

use super::trie::TrieNode;
use crate::data::types::PrefixDocument;

/// Converts a prefix tree into one document per node with suggestions
pub struct TrieFlattener;

impl TrieFlattener {
    /// Depth-first walk emitting a document for every node whose ranked list
    /// is non-empty, keyed by that node's full prefix
    ///
    /// Children are visited in character order, so the output is
    /// deterministic for a given tree.
    pub fn flatten(root: &TrieNode) -> Vec<PrefixDocument> {
        let mut documents = Vec::new();
        let mut stack: Vec<(String, &TrieNode)> = vec![(String::new(), root)];

        while let Some((prefix, node)) = stack.pop() {
            let children: Vec<(char, &TrieNode)> = node.children().collect();
            for (ch, child) in children.into_iter().rev() {
                let mut key = String::with_capacity(prefix.len() + ch.len_utf8());
                key.push_str(&prefix);
                key.push(ch);
                stack.push((key, child));
            }

            if !node.top_k().is_empty() {
                documents.push(PrefixDocument::new(prefix, node.suggestions()));
            }
        }

        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::SuggestionRecord;
    use crate::domain::suggest::trie::TrieBuilder;

    fn build(items: &[(&str, i64)]) -> TrieBuilder {
        let mut builder = TrieBuilder::new();
        for (q, f) in items {
            builder.insert(&SuggestionRecord::new(*q, *f));
        }
        builder
    }

    fn keys(documents: &[PrefixDocument]) -> Vec<&str> {
        documents.iter().map(|d| d.key.as_str()).collect()
    }

    #[test]
    fn test_one_document_per_prefix() {
        let builder = build(&[("cat", 100), ("car", 80), ("cart", 50), ("dog", 70)]);
        let documents = TrieFlattener::flatten(builder.root());

        assert_eq!(
            keys(&documents),
            ["c", "ca", "car", "cart", "cat", "d", "do", "dog"]
        );
        // every non-root node has suggestions, so the counts line up
        assert_eq!(documents.len(), builder.node_count() - 1);
    }

    #[test]
    fn test_document_matches_node() {
        let builder = build(&[("cat", 100), ("car", 80), ("cart", 50)]);
        let documents = TrieFlattener::flatten(builder.root());

        for document in &documents {
            let node = builder.find(&document.key).unwrap();
            assert_eq!(document.suggestions, node.suggestions());
        }
        let ca = documents.iter().find(|d| d.key == "ca").unwrap();
        assert_eq!(
            ca.suggestions,
            vec![
                SuggestionRecord::new("cat", 100),
                SuggestionRecord::new("car", 80),
                SuggestionRecord::new("cart", 50),
            ]
        );
    }

    #[test]
    fn test_root_skipped_without_empty_query() {
        let builder = build(&[("a", 1)]);
        let documents = TrieFlattener::flatten(builder.root());
        assert_eq!(keys(&documents), ["a"]);
    }

    #[test]
    fn test_root_emitted_for_empty_query() {
        let builder = build(&[("", 2), ("a", 1)]);
        let documents = TrieFlattener::flatten(builder.root());
        assert_eq!(keys(&documents), ["", "a"]);
        assert_eq!(documents[0].suggestions, vec![SuggestionRecord::new("", 2)]);
    }

    #[test]
    fn test_empty_tree() {
        let builder = TrieBuilder::new();
        assert!(TrieFlattener::flatten(builder.root()).is_empty());
    }

    #[test]
    fn test_long_query_emits_every_prefix() {
        let query = "z".repeat(1_000);
        let builder = build(&[(query.as_str(), 1)]);
        let documents = TrieFlattener::flatten(builder.root());
        assert_eq!(documents.len(), 1_000);
        assert_eq!(documents.last().unwrap().key, query);
    }
}
