//! Node filtering.
//!
//! A node matches a query if its label or its object id contains the
//! query, ignoring case. Results come back sorted by label, then id, so
//! the same inputs always give the same list no matter how the map
//! iterates.

use lookout_core::{GraphNode, GraphNodes};
use serde::Serialize;
use std::cmp::Ordering;

/// A node that matched a query, paired with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeMatch<'a> {
    pub id: &'a str,
    pub node: &'a GraphNode,
}

/// Returns true if `node` matches `query`.
pub fn matches(node: &GraphNode, query: &str) -> bool {
    matches_lowered(
        &node.label.to_lowercase(),
        &node.object_id.to_lowercase(),
        &query.to_lowercase(),
    )
}

/// The match predicate over already lower-cased fields.
pub(crate) fn matches_lowered(label: &str, object_id: &str, query: &str) -> bool {
    label.contains(query) || object_id.contains(query)
}

/// Result order: label ascending, ties broken by id.
pub(crate) fn result_order(a_id: &str, a: &GraphNode, b_id: &str, b: &GraphNode) -> Ordering {
    a.label.cmp(&b.label).then_with(|| a_id.cmp(b_id))
}

/// Filters `nodes` down to those matching `query`, in result order.
///
/// An empty query matches everything. No limit is applied.
pub fn filter<'a>(query: &str, nodes: &'a GraphNodes) -> Vec<NodeMatch<'a>> {
    let query = query.to_lowercase();

    let mut results: Vec<NodeMatch<'a>> = nodes
        .iter()
        .filter(|(_, node)| {
            query.is_empty()
                || matches_lowered(
                    &node.label.to_lowercase(),
                    &node.object_id.to_lowercase(),
                    &query,
                )
        })
        .map(|(id, node)| NodeMatch { id, node })
        .collect();

    results.sort_by(|a, b| result_order(a.id, a.node, b.id, b.node));
    results
}
