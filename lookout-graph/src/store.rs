use crate::graph::ExploreGraph;
use sled::{Db, Tree};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Named explore graph snapshots kept on disk.
pub struct GraphStore {
    db: Db,
    snapshots: Tree,
}

impl GraphStore {
    /// Opens or creates a graph store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let snapshots = db.open_tree("snapshots")?;
        Ok(Self { db, snapshots })
    }

    /// Saves a graph under `name`, replacing any previous snapshot.
    pub fn save(&self, name: &str, graph: &ExploreGraph) -> Result<(), StoreError> {
        let bytes = bincode::serialize(graph)?;
        debug!("Saving snapshot {} ({} bytes)", name, bytes.len());
        self.snapshots.insert(name, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Loads the graph saved under `name`.
    pub fn load(&self, name: &str) -> Result<Option<ExploreGraph>, StoreError> {
        if let Some(bytes) = self.snapshots.get(name)? {
            let graph: ExploreGraph = bincode::deserialize(&bytes)?;
            Ok(Some(graph))
        } else {
            Ok(None)
        }
    }

    /// Lists snapshot names in order.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        self.snapshots
            .iter()
            .keys()
            .map(|key| -> Result<String, StoreError> {
                Ok(String::from_utf8_lossy(&key?).into_owned())
            })
            .collect()
    }

    /// Removes a snapshot. Returns false if there was none.
    pub fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let existed = self.snapshots.remove(name)?.is_some();
        self.db.flush()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::GraphEdge;
    use crate::graph::GraphResponse;
    use lookout_core::{GraphNode, GraphNodes};
    use tempfile::tempdir;

    fn graph() -> ExploreGraph {
        let mut nodes = GraphNodes::new();
        nodes.insert(
            "1".into(),
            GraphNode::new("computer_node", "Computer", "001").with_last_seen("2023-06-01T12:00:00Z"),
        );
        nodes.insert("2".into(), GraphNode::new("user_node", "Meta", "002").with_tier_zero(true));
        ExploreGraph::from_response(GraphResponse {
            nodes,
            edges: vec![GraphEdge::new("2", "1", "AdminTo")],
        })
    }

    #[test]
    fn test_save_load_snapshot() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();

        let original = graph();
        store.save("corp", &original).unwrap();

        let loaded = store.load("corp").unwrap().unwrap();
        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.edge_count(), 1);
        assert_eq!(loaded.current_nodes(), original.current_nodes());
        assert_eq!(loaded.relationships("2"), original.relationships("2"));
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();
        assert!(store.load("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_and_remove() {
        let dir = tempdir().unwrap();
        let store = GraphStore::open(dir.path()).unwrap();

        store.save("b", &ExploreGraph::new()).unwrap();
        store.save("a", &graph()).unwrap();
        assert_eq!(store.list().unwrap(), vec!["a", "b"]);

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.list().unwrap(), vec!["b"]);
    }
}
