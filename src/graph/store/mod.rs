//! Embedded property-graph store
//!
//! petgraph holds the live graph; an optional redb file persists it across
//! runs so repeated ingests merge into the same graph. Every write is an
//! idempotent upsert keyed by [`NodeKey`] identity, so re-running the full
//! pipeline over the same inputs never grows the graph.

use anyhow::{Context, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use super::store_models::{GraphEdge, GraphNode, NodeKey, NodeLabel, RelKind};
use super::traits::GraphWrite;

// redb table definitions
const NODES_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("nodes");
const EDGES_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("edges");

pub struct GraphStore {
    /// In-memory graph
    graph: RwLock<DiGraph<GraphNode, GraphEdge>>,
    /// Node lookup by canonical key id
    node_index: RwLock<HashMap<String, NodeIndex>>,
    /// Persistence layer (optional)
    db: Option<redb::Database>,
}

impl GraphStore {
    /// Create or open a persistent store under the given directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create store directory {}", dir.display()))?;

        let db_file = dir.join("graph.redb");
        let db = redb::Database::create(&db_file).context("failed to open redb database")?;

        let store = Self {
            graph: RwLock::new(DiGraph::new()),
            node_index: RwLock::new(HashMap::new()),
            db: Some(db),
        };
        store.load()?;
        Ok(store)
    }

    /// Create an in-memory only store (no persistence).
    pub fn in_memory() -> Self {
        Self {
            graph: RwLock::new(DiGraph::new()),
            node_index: RwLock::new(HashMap::new()),
            db: None,
        }
    }

    // RwLock poisoning means a thread panicked while holding the lock;
    // there is no consistent state to recover, so these centralise the
    // panic with a clear message.

    fn read_graph(&self) -> std::sync::RwLockReadGuard<'_, DiGraph<GraphNode, GraphEdge>> {
        self.graph.read().expect("graph lock poisoned")
    }

    fn write_graph(&self) -> std::sync::RwLockWriteGuard<'_, DiGraph<GraphNode, GraphEdge>> {
        self.graph.write().expect("graph lock poisoned")
    }

    fn read_index(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, NodeIndex>> {
        self.node_index.read().expect("index lock poisoned")
    }

    fn write_index(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, NodeIndex>> {
        self.node_index.write().expect("index lock poisoned")
    }

    /// Remove every node and relationship (the explicit "clean" operation).
    pub fn clear(&self) -> Result<()> {
        let mut graph = self.write_graph();
        let mut index = self.write_index();

        graph.clear();
        index.clear();

        if let Some(ref db) = self.db {
            let write_txn = db.begin_write()?;
            let _ = write_txn.delete_table(NODES_TABLE);
            let _ = write_txn.delete_table(EDGES_TABLE);
            write_txn.commit()?;
        }

        Ok(())
    }

    // ==================== Queries ====================

    pub fn get_node(&self, key: &NodeKey) -> Option<GraphNode> {
        let index = self.read_index();
        let graph = self.read_graph();
        index
            .get(&key.id())
            .and_then(|&idx| graph.node_weight(idx).cloned())
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.read_index().contains_key(&key.id())
    }

    pub fn nodes_by_label(&self, label: NodeLabel) -> Vec<GraphNode> {
        let graph = self.read_graph();
        graph
            .node_weights()
            .filter(|n| n.key.label == label)
            .cloned()
            .collect()
    }

    /// All relationships of one kind as `(source_id, target_id)` pairs.
    pub fn relationships_of(&self, kind: RelKind) -> Vec<(String, String)> {
        let graph = self.read_graph();
        graph
            .edge_references()
            .filter(|e| e.weight().kind == kind)
            .filter_map(|e| {
                let src = graph.node_weight(e.source())?;
                let dst = graph.node_weight(e.target())?;
                Some((src.key.id(), dst.key.id()))
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.read_graph().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.read_graph().edge_count()
    }

    /// Per-label node counts plus totals.
    pub fn stats(&self) -> HashMap<String, i64> {
        let graph = self.read_graph();
        let mut stats = HashMap::new();

        for node in graph.node_weights() {
            *stats.entry(node.key.label.to_string()).or_insert(0i64) += 1;
        }
        stats.insert("total_nodes".to_string(), graph.node_count() as i64);
        stats.insert("total_edges".to_string(), graph.edge_count() as i64);

        stats
    }

    // ==================== Persistence ====================

    /// Persist the graph to redb.
    pub fn save(&self) -> Result<()> {
        let db = match &self.db {
            Some(db) => db,
            None => return Ok(()),
        };

        let graph = self.read_graph();

        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(NODES_TABLE)?;
            for node in graph.node_weights() {
                let key = node.key.id();
                let value = serde_json::to_vec(node)?;
                table.insert(key.as_str(), value.as_slice())?;
            }

            let edges: Vec<(String, String, GraphEdge)> = graph
                .edge_references()
                .filter_map(|e| {
                    let src = graph.node_weight(e.source())?;
                    let dst = graph.node_weight(e.target())?;
                    Some((src.key.id(), dst.key.id(), e.weight().clone()))
                })
                .collect();
            let edges_data = serde_json::to_vec(&edges)?;

            let mut edges_table = write_txn.open_table(EDGES_TABLE)?;
            edges_table.insert("__edges__", edges_data.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Load the graph from redb.
    fn load(&self) -> Result<()> {
        let db = match &self.db {
            Some(db) => db,
            None => return Ok(()),
        };

        let read_txn = db.begin_read()?;

        // Missing tables mean a fresh database.
        let nodes_table = match read_txn.open_table(NODES_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut graph = self.write_graph();
        let mut index = self.write_index();

        for item in nodes_table.range::<&str>(..)? {
            let (_, value) = item?;
            let node: GraphNode = serde_json::from_slice(value.value())?;
            let id = node.key.id();
            let idx = graph.add_node(node);
            index.insert(id, idx);
        }

        let edges_table = match read_txn.open_table(EDGES_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if let Some(entry) = edges_table.get("__edges__")? {
            let edges: Vec<(String, String, GraphEdge)> = serde_json::from_slice(entry.value())?;
            for (src_id, dst_id, edge) in edges {
                if let (Some(&src), Some(&dst)) = (index.get(&src_id), index.get(&dst_id)) {
                    graph.add_edge(src, dst, edge);
                }
            }
        }

        Ok(())
    }
}

impl GraphWrite for GraphStore {
    fn merge_node(&self, key: &NodeKey) -> Result<bool> {
        let mut graph = self.write_graph();
        let mut index = self.write_index();

        let id = key.id();
        if index.contains_key(&id) {
            return Ok(false);
        }

        let idx = graph.add_node(GraphNode::new(key.clone()));
        index.insert(id, idx);
        Ok(true)
    }

    fn merge_relationship(&self, from: &NodeKey, kind: RelKind, to: &NodeKey) -> Result<bool> {
        // Lock graph before index to keep writer lock ordering consistent
        // across the store.
        let mut graph = self.write_graph();
        let index = self.read_index();

        let (Some(&src), Some(&dst)) = (index.get(&from.id()), index.get(&to.id())) else {
            return Ok(false);
        };

        let exists = graph
            .edges_connecting(src, dst)
            .any(|e| e.weight().kind == kind);
        if exists {
            return Ok(false);
        }

        graph.add_edge(src, dst, GraphEdge::new(kind));
        Ok(true)
    }

    fn set_properties(&self, key: &NodeKey, props: &[(&str, serde_json::Value)]) -> Result<bool> {
        let mut graph = self.write_graph();
        let index = self.read_index();

        let Some(&idx) = index.get(&key.id()) else {
            return Ok(false);
        };
        let Some(node) = graph.node_weight_mut(idx) else {
            return Ok(false);
        };

        for (k, v) in props {
            node.props.insert((*k).to_string(), v.clone());
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
