//! Search index over a fixed node collection.
//!
//! This module provides an n-gram inverted index over node labels and
//! object ids. It returns exactly what `matcher::filter` returns, in the
//! same order, without scanning every node for longer queries.

use crate::matcher::{matches_lowered, result_order, NodeMatch};
use lookout_core::{GraphNode, GraphNodes};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Minimum n-gram length for indexing.
const MIN_NGRAM_LEN: usize = 2;

/// Maximum n-gram length for indexing.
const MAX_NGRAM_LEN: usize = 4;

/// A node with its searchable fields pre-lowered.
#[derive(Debug, Clone)]
struct IndexedNode {
    id: String,
    label: String,
    object_id: String,
}

/// An inverted index for node search.
///
/// Built once from a node collection; a new collection means a new index.
/// Nodes are stored by rank (their position in result order) so sorting
/// candidates by rank sorts them by label and id.
#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    /// The collection being searched.
    nodes: GraphNodes,
    /// Lowered fields, in result order.
    ranked: Vec<IndexedNode>,
    /// Maps node ids to ranks.
    ranks: HashMap<String, usize>,
    /// Maps lowercased n-grams to ranks.
    ngram_index: HashMap<String, HashSet<usize>>,
}

impl SearchIndex {
    /// Builds an index over `nodes`.
    pub fn new(nodes: GraphNodes) -> Self {
        let mut ordered: Vec<(&String, &GraphNode)> = nodes.iter().collect();
        ordered.sort_by(|a, b| result_order(a.0, a.1, b.0, b.1));

        let ranked: Vec<IndexedNode> = ordered
            .into_iter()
            .map(|(id, node)| IndexedNode {
                id: id.clone(),
                label: node.label.to_lowercase(),
                object_id: node.object_id.to_lowercase(),
            })
            .collect();

        let mut ranks = HashMap::with_capacity(ranked.len());
        let mut ngram_index: HashMap<String, HashSet<usize>> = HashMap::new();
        for (rank, entry) in ranked.iter().enumerate() {
            ranks.insert(entry.id.clone(), rank);
            for field in [&entry.label, &entry.object_id] {
                for ngram in generate_ngrams(field) {
                    ngram_index.entry(ngram).or_default().insert(rank);
                }
            }
        }

        debug!(
            "Indexed {} nodes ({} n-grams)",
            ranked.len(),
            ngram_index.len()
        );

        Self {
            nodes,
            ranked,
            ranks,
            ngram_index,
        }
    }

    /// Searches for nodes whose label or object id contains the query.
    ///
    /// Returns matches in result order. An empty query returns every node.
    pub fn search(&self, query: &str) -> Vec<NodeMatch<'_>> {
        let query_lower = query.to_lowercase();

        if query_lower.is_empty() {
            return (0..self.ranked.len())
                .filter_map(|rank| self.resolve(rank))
                .collect();
        }

        // Too short for n-grams, scan instead
        if query_lower.chars().count() < MIN_NGRAM_LEN {
            return self
                .ranked
                .iter()
                .enumerate()
                .filter(|(_, e)| matches_lowered(&e.label, &e.object_id, &query_lower))
                .filter_map(|(rank, _)| self.resolve(rank))
                .collect();
        }

        // Find candidate nodes by intersecting n-gram matches
        let mut candidates: Option<HashSet<usize>> = None;
        for ngram in generate_ngrams(&query_lower) {
            let Some(ranks) = self.ngram_index.get(&ngram) else {
                // If any n-gram has no matches, the query has no results
                return Vec::new();
            };
            match &mut candidates {
                None => candidates = Some(ranks.clone()),
                Some(c) => c.retain(|rank| ranks.contains(rank)),
            }
        }

        // Grams may come from different fields, so verify the full substring
        let mut hits: Vec<usize> = candidates
            .unwrap_or_default()
            .into_iter()
            .filter(|&rank| {
                let e = &self.ranked[rank];
                matches_lowered(&e.label, &e.object_id, &query_lower)
            })
            .collect();
        hits.sort_unstable();

        hits.into_iter()
            .filter_map(|rank| self.resolve(rank))
            .collect()
    }

    /// Gets a node by id.
    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Returns true if the id is in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.ranks.contains_key(id)
    }

    /// The collection this index was built from.
    pub fn nodes(&self) -> &GraphNodes {
        &self.nodes
    }

    /// Returns the number of nodes indexed.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    fn resolve(&self, rank: usize) -> Option<NodeMatch<'_>> {
        let entry = self.ranked.get(rank)?;
        let (id, node) = self.nodes.get_key_value(&entry.id)?;
        Some(NodeMatch { id, node })
    }
}

/// Generates n-grams for a lowercased string.
fn generate_ngrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut ngrams = Vec::new();

    for n in MIN_NGRAM_LEN..=MAX_NGRAM_LEN {
        if chars.len() >= n {
            for i in 0..=(chars.len() - n) {
                ngrams.push(chars[i..i + n].iter().collect());
            }
        }
    }

    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::filter;

    fn fixture() -> GraphNodes {
        let mut nodes = GraphNodes::new();
        nodes.insert("1".into(), GraphNode::new("computer_node", "Computer", "001"));
        nodes.insert("2".into(), GraphNode::new("user_node", "User", "002"));
        nodes.insert("3".into(), GraphNode::new("group_node", "Group", "003"));
        nodes
    }

    fn ids<'a>(results: &[NodeMatch<'a>]) -> Vec<&'a str> {
        results.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_search_scenarios() {
        let index = SearchIndex::new(fixture());

        assert_eq!(index.search("node").len(), 3);
        assert_eq!(ids(&index.search("computer")), vec!["1"]);
        assert_eq!(index.search("00").len(), 3);
        assert_eq!(ids(&index.search("002")), vec!["2"]);
        assert!(index.search("specterops").is_empty());
    }

    #[test]
    fn test_empty_query_returns_all_in_label_order() {
        let index = SearchIndex::new(fixture());
        assert_eq!(ids(&index.search("")), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_short_query_is_substring_not_prefix() {
        let index = SearchIndex::new(fixture());

        // "_" sits in the middle of every label
        assert_eq!(index.search("_").len(), 3);
        assert_eq!(ids(&index.search("3")), vec!["3"]);
    }

    #[test]
    fn test_grams_split_across_fields_are_rejected() {
        let mut nodes = GraphNodes::new();
        // "ab" + "cd" live in different fields; "abcd" is in neither
        nodes.insert("x".into(), GraphNode::new("ab", "User", "cd bc"));
        let index = SearchIndex::new(nodes);

        assert!(index.search("abcd").is_empty());
        assert!(index.search("abc").is_empty());
        assert_eq!(index.search("bc").len(), 1);
    }

    #[test]
    fn test_agrees_with_filter() {
        let mut nodes = fixture();
        nodes.insert(
            "4".into(),
            GraphNode::new("ADMINISTRATOR@CORP.LOCAL", "User", "S-1-5-21-500"),
        );
        nodes.insert("5".into(), GraphNode::new("", "Group", "S-1-5-32-544"));
        nodes.insert("6".into(), GraphNode::new("Ünïcode_Nöde", "Computer", "006"));
        let index = SearchIndex::new(nodes.clone());

        for query in [
            "", "a", "n", "no", "node", "NODE", "s-1-5", "-5", "544", "corp.local", "ünï", "nöde",
            "xyz", "administrator@corp.local",
        ] {
            assert_eq!(
                ids(&index.search(query)),
                ids(&filter(query, &nodes)),
                "query {query:?}"
            );
        }
    }

    #[test]
    fn test_get_and_len() {
        let index = SearchIndex::new(fixture());
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
        assert!(index.contains("2"));
        assert_eq!(index.get("2").unwrap().label, "user_node");
        assert!(index.get("9").is_none());
        assert!(SearchIndex::new(GraphNodes::new()).is_empty());
    }
}
