//! Lookout Core - Graph node model
//!
//! This crate defines the nodes of an attack-path explore graph as the
//! host application supplies them, and reads node collections from disk.
//!
//! # Example
//!
//! ```
//! use lookout_core::{GraphNode, GraphNodes, NodeKind};
//!
//! let mut nodes = GraphNodes::new();
//! nodes.insert("1".to_string(), GraphNode::new("computer_node", "Computer", "001"));
//!
//! assert_eq!(nodes["1"].kind, NodeKind::Computer);
//! assert_eq!(nodes["1"].display_text(), "computer_node");
//! ```

mod error;
mod load;
mod node;

pub use error::{LoadError, Result};
pub use load::{load_nodes, parse_nodes};
pub use node::{GraphNode, GraphNodes, NodeKind};
