//! Explore graph data structure.
//!
//! The ExploreGraph wraps petgraph and adds an id index. It holds what the
//! host currently has on screen: the nodes and the relationships between
//! them. Search only ever sees `current_nodes()`.

use crate::edge::{Edge, GraphEdge, Relationship, RelationshipDirection};
use lookout_core::{GraphNode, GraphNodes, LoadError};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Index of a node inside the petgraph graph.
pub type NodeId = NodeIndex;

/// A node together with its host-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    pub node: GraphNode,
}

/// The graph payload served for the explore view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: GraphNodes,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// The shapes a graph file may take on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum GraphFile {
    Wrapped { data: GraphResponse },
    Response(GraphResponse),
    Nodes(GraphNodes),
}

impl From<GraphFile> for GraphResponse {
    fn from(file: GraphFile) -> Self {
        match file {
            GraphFile::Wrapped { data } => data,
            GraphFile::Response(response) => response,
            GraphFile::Nodes(nodes) => GraphResponse {
                nodes,
                edges: Vec::new(),
            },
        }
    }
}

/// The explore graph.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExploreGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<NodeEntry, Edge>,

    /// Maps host ids to graph node indexes.
    id_index: HashMap<String, NodeId>,
}

impl ExploreGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a response payload.
    ///
    /// Nodes are inserted in id order so the same payload always yields
    /// the same graph. Edges that name an unknown node are dropped.
    pub fn from_response(response: GraphResponse) -> Self {
        let mut graph = Self::new();

        let mut nodes: Vec<(String, GraphNode)> = response.nodes.into_iter().collect();
        nodes.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, node) in nodes {
            graph.add_node(id, node);
        }

        for edge in response.edges {
            if !graph.add_edge(&edge.source, &edge.target, Edge::new(edge.kind.clone())) {
                warn!(
                    "Skipping {} edge {} -> {}: unknown node",
                    edge.kind, edge.source, edge.target
                );
            }
        }

        debug!(
            "Built explore graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Builds a graph with nodes only.
    pub fn from_nodes(nodes: GraphNodes) -> Self {
        Self::from_response(GraphResponse {
            nodes,
            edges: Vec::new(),
        })
    }

    /// Adds a node, replacing any node already stored under `id`.
    pub fn add_node(&mut self, id: impl Into<String>, node: GraphNode) -> NodeId {
        let id = id.into();
        if let Some(&index) = self.id_index.get(&id) {
            if let Some(entry) = self.graph.node_weight_mut(index) {
                entry.node = node;
            }
            return index;
        }

        let index = self.graph.add_node(NodeEntry {
            id: id.clone(),
            node,
        });
        self.id_index.insert(id, index);
        index
    }

    /// Adds a relationship between two known nodes.
    ///
    /// Returns false if either end is unknown.
    pub fn add_edge(&mut self, source: &str, target: &str, edge: Edge) -> bool {
        match (self.get_index(source), self.get_index(target)) {
            (Some(from), Some(to)) => {
                self.graph.add_edge(from, to, edge);
                true
            }
            _ => false,
        }
    }

    /// Gets a node by its host id.
    pub fn get_by_id(&self, id: &str) -> Option<&GraphNode> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index).map(|entry| &entry.node)
    }

    /// Gets the graph index for a host id.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Returns the node collection handed to search.
    pub fn current_nodes(&self) -> GraphNodes {
        self.graph
            .node_weights()
            .map(|entry| (entry.id.clone(), entry.node.clone()))
            .collect()
    }

    /// Lists the relationships of a node, outbound first, then by kind and
    /// peer id. Unknown ids have none.
    pub fn relationships(&self, id: &str) -> Vec<Relationship> {
        let Some(index) = self.get_index(id) else {
            return Vec::new();
        };

        let mut result: Vec<Relationship> = Vec::new();
        for (petgraph_dir, direction) in [
            (Direction::Outgoing, RelationshipDirection::Outbound),
            (Direction::Incoming, RelationshipDirection::Inbound),
        ] {
            for edge_ref in self.graph.edges_directed(index, petgraph_dir) {
                let peer_index = match petgraph_dir {
                    Direction::Outgoing => edge_ref.target(),
                    Direction::Incoming => edge_ref.source(),
                };
                if let Some(peer) = self.graph.node_weight(peer_index) {
                    result.push(Relationship {
                        direction,
                        kind: edge_ref.weight().kind.clone(),
                        peer: peer.id.clone(),
                    });
                }
            }
        }

        result.sort_by(|a, b| {
            a.direction
                .cmp(&b.direction)
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.peer.cmp(&b.peer))
        });
        result
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes with their ids.
    pub fn entries(&self) -> impl Iterator<Item = &NodeEntry> {
        self.graph.node_weights()
    }
}

/// Graph statistics for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub tier_zero: usize,
}

impl ExploreGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            tier_zero: self.entries().filter(|e| e.node.is_tier_zero).count(),
        }
    }
}

/// Parses a graph file: a response (optionally wrapped in `data`) or a
/// bare `{ id: node }` object.
pub fn parse_graph(text: &str) -> serde_json::Result<ExploreGraph> {
    let file: GraphFile = serde_json::from_str(text)?;
    Ok(ExploreGraph::from_response(file.into()))
}

/// Loads a graph file from disk.
pub fn load_graph(path: &Path) -> lookout_core::Result<ExploreGraph> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_graph(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
