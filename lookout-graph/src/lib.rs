//! Lookout Graph - Explore graph search and selection
//!
//! This crate holds the explore graph a host has on screen and the
//! search box that sits on top of it: a substring matcher, an n-gram
//! index that answers the same queries faster, keyword highlighting and
//! the selection state machine.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with an id index. Search never
//! touches edges; it works on the `GraphNodes` the graph hands out:
//! - `filter` is the reference matcher
//! - `SearchIndex` answers the same query from n-grams
//! - `SearchState` / `SearchSession` track query, highlight and selection
//!
//! # Example
//!
//! ```
//! use lookout_core::{GraphNode, GraphNodes};
//! use lookout_graph::{SearchEvent, SearchSession, Selection};
//!
//! let mut nodes = GraphNodes::new();
//! nodes.insert("1".into(), GraphNode::new("computer_node", "Computer", "001"));
//! nodes.insert("2".into(), GraphNode::new("user_node", "User", "002"));
//!
//! let mut session = SearchSession::new(nodes, |picked: &Selection| println!("picked {}", picked.id));
//! session.set_query("computer");
//! let picked = session.dispatch(SearchEvent::Click(0));
//! assert_eq!(picked.map(|s| s.id), Some("1".to_string()));
//! ```

mod edge;
mod graph;
mod highlight;
mod matcher;
mod search_index;
mod session;
mod store;

pub use edge::{Edge, GraphEdge, Relationship, RelationshipDirection};
pub use graph::{
    load_graph, parse_graph, ExploreGraph, GraphResponse, GraphStats, NodeEntry, NodeId,
};
pub use highlight::{highlight, Segment};
pub use matcher::{filter, matches, NodeMatch};
pub use search_index::SearchIndex;
pub use session::{
    Phase, SearchEvent, SearchSession, SearchState, Selection, Transition, NO_RESULTS_TEXT,
};
pub use store::{GraphStore, StoreError};
