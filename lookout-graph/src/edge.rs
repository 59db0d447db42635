//! Relationship types for the explore graph.
//!
//! Relationship kinds come straight from the graph schema (`MemberOf`,
//! `AdminTo`, `GenericAll`, ...). The schema keeps growing, so we carry
//! the kind as its tag instead of a closed enum.

use serde::{Deserialize, Serialize};

/// A relationship stored on a graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The relationship tag, e.g. `MemberOf`.
    pub kind: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// An edge as it appears in a graph response, keyed by node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(alias = "label")]
    pub kind: String,
}

impl GraphEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
        }
    }
}

/// Which way a relationship points, seen from a given node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipDirection {
    /// The node is the source.
    Outbound,
    /// The node is the target.
    Inbound,
}

impl std::fmt::Display for RelationshipDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipDirection::Outbound => write!(f, "outbound"),
            RelationshipDirection::Inbound => write!(f, "inbound"),
        }
    }
}

/// One relationship of a node, with the id of the node on the other end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub direction: RelationshipDirection,
    pub kind: String,
    pub peer: String,
}
