//! Reading node collections from JSON files.

use crate::error::{LoadError, Result};
use crate::node::GraphNodes;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads a `{ id: node }` JSON object from disk.
pub fn load_nodes(path: &Path) -> Result<GraphNodes> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let nodes = parse_nodes(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {} nodes from {}", nodes.len(), path.display());
    Ok(nodes)
}

/// Parses a `{ id: node }` JSON object.
pub fn parse_nodes(text: &str) -> serde_json::Result<GraphNodes> {
    serde_json::from_str(text)
}
